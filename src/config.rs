use crate::domain::error::DomainError;
use crate::domain::values::embedding::{DEFAULT_DIMENSION, DEFAULT_NORM_TOLERANCE};
use crate::domain::values::relevance::DEFAULT_RELEVANCE_THRESHOLD;
use std::str::FromStr;

/// Engine settings. Passed by value into every component so that several
/// independently configured engines can coexist in one process.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub dimension: usize,
    /// Matches scoring below this are labelled low confidence, never dropped.
    pub relevance_threshold: f32,
    pub faq_top_k: usize,
    pub anomaly_top_k: usize,
    pub norm_tolerance: f64,
    /// Spread the pairwise anomaly pass across the rayon pool.
    pub parallel_anomalies: bool,
    pub embed_batch_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            faq_top_k: 3,
            anomaly_top_k: 3,
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
            parallel_anomalies: true,
            embed_batch_size: 32,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `SEMSEARCH_*` environment variables.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, "SEMSEARCH_DIMENSION")? {
            config.dimension = v;
        }
        if let Some(v) = parse_var(&lookup, "SEMSEARCH_THRESHOLD")? {
            config.relevance_threshold = v;
        }
        if let Some(v) = parse_var(&lookup, "SEMSEARCH_TOP_K")? {
            config.faq_top_k = v;
        }
        if let Some(v) = parse_var(&lookup, "SEMSEARCH_ANOMALY_TOP_K")? {
            config.anomaly_top_k = v;
        }
        if let Some(v) = parse_var(&lookup, "SEMSEARCH_PARALLEL")? {
            config.parallel_anomalies = v;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.dimension == 0 {
            return Err(DomainError::InvalidInput("dimension must be positive".into()));
        }
        if !(-1.0..=1.0).contains(&self.relevance_threshold) {
            return Err(DomainError::InvalidInput(format!(
                "relevance threshold must be within [-1, 1], got {}",
                self.relevance_threshold
            )));
        }
        if self.embed_batch_size == 0 {
            return Err(DomainError::InvalidInput("embed batch size must be positive".into()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, DomainError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| DomainError::InvalidInput(format!("{key}: cannot parse '{raw}'"))),
    }
}
