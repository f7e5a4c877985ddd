use crate::domain::entities::document::{Document, DocumentKind};
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use crate::domain::values::collection::Collection;
use crate::domain::values::embedding::EmbeddingVector;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A parsed but not yet embedded document, as handed over by extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

pub struct IngestUseCase {
    repo: Arc<dyn DocumentRepository>,
    embedder: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
}

impl IngestUseCase {
    pub fn new(
        repo: Arc<dyn DocumentRepository>,
        embedder: Arc<dyn EmbeddingProvider>,
        batch_size: usize,
    ) -> Self {
        Self {
            repo,
            embedder,
            batch_size: batch_size.max(1),
        }
    }

    /// Embed and store `records` into `collection`. Every batch is embedded
    /// and normalized before anything is written, and the write is a single
    /// transaction, so a failure leaves the repository untouched. The
    /// collection is registered even when `records` is empty. Returns the
    /// number stored.
    pub async fn ingest(&self, collection: Collection, records: Vec<IngestRecord>) -> Result<usize, DomainError> {
        let total = records.len();

        // Validate metadata before paying for any embedding calls
        let kinds = records
            .iter()
            .map(|r| DocumentKind::from_metadata(collection, &r.metadata))
            .collect::<Result<Vec<_>, _>>()?;

        let mut documents = Vec::with_capacity(total);
        for (chunk, kinds) in records.chunks(self.batch_size).zip(kinds.chunks(self.batch_size)) {
            let texts: Vec<String> = chunk.iter().map(|r| r.text.clone()).collect();
            let vectors = self.embedder.embed(&texts, InputType::Document).await?;
            if vectors.len() != chunk.len() {
                return Err(DomainError::Embedding(format!(
                    "provider returned {} vectors for {} texts",
                    vectors.len(),
                    chunk.len()
                )));
            }
            for ((record, kind), raw) in chunk.iter().zip(kinds).zip(vectors) {
                let id = record
                    .id
                    .clone()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
                documents.push(Document::new(id, record.text.clone(), kind.clone(), EmbeddingVector::normalize(raw)?));
            }
            tracing::info!(%collection, embedded = documents.len(), total, "embedded batch");
        }

        self.repo.add_all(collection, &documents)?;
        Ok(documents.len())
    }
}

/// Stores documents that already carry their embeddings.
pub struct ImportUseCase {
    repo: Arc<dyn DocumentRepository>,
}

impl ImportUseCase {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    pub fn import(&self, collection: Collection, documents: &[Document]) -> Result<usize, DomainError> {
        self.repo.add_all(collection, documents)?;
        tracing::info!(%collection, documents = documents.len(), "imported documents");
        Ok(documents.len())
    }
}
