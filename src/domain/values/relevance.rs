use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cut-off below which a match is flagged as low confidence.
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.6;

/// Presentation label for a ranked match. Never used to drop results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    Relevant,
    LowConfidence,
}

impl Relevance {
    pub fn classify(score: f32, threshold: f32) -> Self {
        if score >= threshold {
            Relevance::Relevant
        } else {
            Relevance::LowConfidence
        }
    }
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relevance::Relevant => write!(f, "relevant"),
            Relevance::LowConfidence => write!(f, "low confidence"),
        }
    }
}
