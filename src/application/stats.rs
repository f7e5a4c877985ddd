use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::{CollectionStats, DocumentRepository};
use std::sync::Arc;

pub struct StatsUseCase {
    repo: Arc<dyn DocumentRepository>,
}

impl StatsUseCase {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self { repo }
    }

    pub fn stats(&self) -> Result<Vec<CollectionStats>, DomainError> {
        self.repo.stats()
    }
}
