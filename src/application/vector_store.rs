use crate::config::EngineConfig;
use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::DocumentRepository;
use crate::domain::values::collection::Collection;
use crate::domain::values::embedding::EmbeddingVector;
use std::collections::{HashMap, HashSet};

/// Read-only, fully loaded documents grouped by collection.
///
/// Every vector has been checked for dimension and unit norm on the way in,
/// so scoring code can treat them as trusted. Nothing mutates a store after
/// construction, which makes it safe to share behind an `Arc` across any
/// number of concurrent queries.
#[derive(Debug)]
pub struct VectorStore {
    dimension: usize,
    norm_tolerance: f64,
    collections: HashMap<Collection, Vec<Document>>,
}

impl VectorStore {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            dimension: config.dimension,
            norm_tolerance: config.norm_tolerance,
            collections: HashMap::new(),
        }
    }

    /// Snapshot every registered collection of `repo`.
    pub fn from_repository(repo: &dyn DocumentRepository, config: &EngineConfig) -> Result<Self, DomainError> {
        let mut store = Self::new(config);
        for collection in repo.collections()? {
            let documents = repo.list(collection)?;
            tracing::debug!(%collection, documents = documents.len(), "loaded collection");
            store = store.with_collection(collection, documents)?;
        }
        Ok(store)
    }

    /// Add a collection. Passing an empty `documents` still registers it.
    pub fn with_collection(mut self, collection: Collection, documents: Vec<Document>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(documents.len());
        for doc in &documents {
            if doc.collection() != collection {
                return Err(DomainError::InvalidInput(format!(
                    "document {} belongs to {}, not {collection}",
                    doc.id,
                    doc.collection()
                )));
            }
            if !seen.insert(doc.id.as_str()) {
                return Err(DomainError::InvalidInput(format!(
                    "duplicate document id {} in {collection}",
                    doc.id
                )));
            }
            self.check_vector(&doc.vector)?;
        }
        self.collections.insert(collection, documents);
        Ok(self)
    }

    fn check_vector(&self, vector: &EmbeddingVector) -> Result<(), DomainError> {
        if vector.dimension() != self.dimension {
            return Err(DomainError::VectorDimensionMismatch {
                expected: self.dimension,
                found: vector.dimension(),
            });
        }
        let norm = vector.norm();
        if (norm - 1.0).abs() > self.norm_tolerance {
            return Err(DomainError::Normalization { norm });
        }
        Ok(())
    }

    /// Documents of `collection` in insertion order.
    pub fn load(&self, collection: Collection) -> Result<&[Document], DomainError> {
        self.collections
            .get(&collection)
            .map(Vec::as_slice)
            .ok_or(DomainError::CollectionNotFound(collection))
    }

    /// Vectors aligned index-for-index with [`VectorStore::load`].
    pub fn get_vectors(&self, collection: Collection) -> Result<Vec<&EmbeddingVector>, DomainError> {
        Ok(self.load(collection)?.iter().map(|d| &d.vector).collect())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn contains(&self, collection: Collection) -> bool {
        self.collections.contains_key(&collection)
    }
}
