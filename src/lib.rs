pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

use crate::application::anomalies::AnomalyScorer;
use crate::application::ingest::IngestUseCase;
use crate::application::query::QueryService;
use crate::application::similarity_index::SimilarityIndex;
use crate::application::stats::StatsUseCase;
use crate::application::vector_store::VectorStore;
use crate::config::EngineConfig;
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::{CollectionStats, DocumentRepository};
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::values::collection::Collection;
use crate::domain::values::scores::{AnomalyScore, RankedMatch};
use crate::infrastructure::embeddings::http::HttpEmbeddingProvider;
use crate::infrastructure::sqlite::document_repo::SqliteDocumentRepo;
use crate::infrastructure::sqlite::migrations::run_migrations;
use rusqlite::Connection;
use std::sync::Arc;

/// Query-side engine over a read-only snapshot of the document repository.
pub struct SemSearch {
    config: EngineConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    query_svc: QueryService,
    anomaly_scorer: AnomalyScorer,
    stats_uc: StatsUseCase,
}

impl SemSearch {
    /// Open `db_path` and use the embedding endpoint named by the
    /// `SEMSEARCH_EMBEDDING_*` environment variables.
    pub fn new(db_path: &str, config: EngineConfig) -> Result<Self, DomainError> {
        let repo = open_repository(db_path)?;
        let embedder = embedder_from_env(&config);
        Self::with_providers(repo, embedder, config)
    }

    pub fn with_providers(
        repo: Arc<dyn DocumentRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: EngineConfig,
    ) -> Result<Self, DomainError> {
        config.validate()?;

        let provider_dim = embedder.dimension();
        if provider_dim > 0 && provider_dim != config.dimension {
            tracing::warn!(
                provider_dim,
                configured_dim = config.dimension,
                "embedding provider dimension differs from configured dimension; queries will be rejected"
            );
        }

        let store = Arc::new(VectorStore::from_repository(repo.as_ref(), &config)?);
        tracing::info!(
            collections = ?Collection::ALL.iter().filter(|c| store.contains(**c)).collect::<Vec<_>>(),
            "loaded vector store"
        );

        Ok(Self {
            query_svc: QueryService::new(
                SimilarityIndex::new(store.clone()),
                config.faq_top_k,
                config.relevance_threshold,
            ),
            anomaly_scorer: AnomalyScorer::new(store, config.parallel_anomalies),
            stats_uc: StatsUseCase::new(repo),
            embedder,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::InvalidInput("query is empty".into()));
        }
        self.embedder
            .embed(&[query.to_string()], InputType::Query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Embedding("provider returned no vector for the query".into()))
    }

    pub async fn search_faq(&self, query: &str) -> Result<Vec<RankedMatch<'_>>, DomainError> {
        let vector = self.embed_query(query).await?;
        self.query_svc.search_faq(&vector)
    }

    pub async fn search_faq_top(&self, query: &str, top_k: usize) -> Result<Vec<RankedMatch<'_>>, DomainError> {
        let vector = self.embed_query(query).await?;
        self.query_svc.search_faq_top(&vector, top_k)
    }

    pub async fn rank_movies(&self, query: &str) -> Result<Vec<RankedMatch<'_>>, DomainError> {
        let vector = self.embed_query(query).await?;
        self.query_svc.rank_movies(&vector)
    }

    pub fn search_faq_vector(&self, query: &[f32]) -> Result<Vec<RankedMatch<'_>>, DomainError> {
        self.query_svc.search_faq(query)
    }

    pub fn rank_movies_vector(&self, query: &[f32]) -> Result<Vec<RankedMatch<'_>>, DomainError> {
        self.query_svc.rank_movies(query)
    }

    /// Falls back to the configured `anomaly_top_k` when `top_k` is `None`.
    pub fn detect_anomalies(
        &self,
        collection: Collection,
        top_k: Option<usize>,
    ) -> Result<Vec<AnomalyScore<'_>>, DomainError> {
        self.anomaly_scorer
            .detect_anomalies(collection, top_k.unwrap_or(self.config.anomaly_top_k))
    }

    pub fn stats(&self) -> Result<Vec<CollectionStats>, DomainError> {
        self.stats_uc.stats()
    }
}

/// Open (creating if needed) the SQLite document database.
pub fn open_repository(db_path: &str) -> Result<Arc<dyn DocumentRepository>, DomainError> {
    let conn = Connection::open(db_path).map_err(|e| DomainError::Database(format!("DB error: {e}")))?;
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(|e| DomainError::Database(format!("WAL error: {e}")))?;
    run_migrations(&conn)?;
    Ok(Arc::new(SqliteDocumentRepo::new(conn)))
}

pub fn embedder_from_env(config: &EngineConfig) -> Arc<dyn EmbeddingProvider> {
    let base_url = std::env::var("SEMSEARCH_EMBEDDING_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let api_key = std::env::var("SEMSEARCH_EMBEDDING_API_KEY").ok();
    let model = std::env::var("SEMSEARCH_EMBEDDING_MODEL").ok();
    Arc::new(HttpEmbeddingProvider::new(base_url, api_key, model, config.dimension))
}

/// Ingestion wired to the same repository and embedder a [`SemSearch`] reads.
pub fn ingestor(
    repo: Arc<dyn DocumentRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: &EngineConfig,
) -> IngestUseCase {
    IngestUseCase::new(repo, embedder, config.embed_batch_size)
}
