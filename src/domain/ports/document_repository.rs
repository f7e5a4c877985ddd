use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;
use crate::domain::values::collection::Collection;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    pub collection: Collection,
    pub documents: usize,
    pub ingested_at: String,
}

/// Persistent home of embedded documents, written by ingestion and read once
/// when a query snapshot is built.
pub trait DocumentRepository: Send + Sync {
    /// Store `documents` into `collection` atomically, registering the
    /// collection even when `documents` is empty. Ids are scoped to their
    /// collection; re-adding an id replaces that document in place.
    fn add_all(&self, collection: Collection, documents: &[Document]) -> Result<(), DomainError>;
    /// Documents of `collection` in insertion order.
    fn list(&self, collection: Collection) -> Result<Vec<Document>, DomainError>;
    /// Registered collections, whether or not they hold documents.
    fn collections(&self) -> Result<Vec<Collection>, DomainError>;
    fn stats(&self) -> Result<Vec<CollectionStats>, DomainError>;
}
