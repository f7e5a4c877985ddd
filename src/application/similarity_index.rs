use crate::application::vector_store::VectorStore;
use crate::domain::error::DomainError;
use crate::domain::values::collection::Collection;
use crate::domain::values::embedding::EmbeddingVector;
use crate::domain::values::scores::SimilarityResult;
use std::sync::Arc;

/// Exhaustive cosine ranking over one collection of a [`VectorStore`].
pub struct SimilarityIndex {
    store: Arc<VectorStore>,
}

impl SimilarityIndex {
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self { store }
    }

    /// Normalize a caller-supplied query vector and check it against the
    /// store's dimension. Callers are never trusted to have done either.
    pub fn prepare_query(&self, query: &[f32]) -> Result<EmbeddingVector, DomainError> {
        if query.len() != self.store.dimension() {
            return Err(DomainError::VectorDimensionMismatch {
                expected: self.store.dimension(),
                found: query.len(),
            });
        }
        EmbeddingVector::normalize(query.to_vec())
    }

    /// Score every document of `collection` against `query`, best first.
    ///
    /// With `top_k` set only the `top_k` best are returned; otherwise the
    /// whole collection is. Equal scores keep insertion order. An empty
    /// collection yields an empty list.
    pub fn rank(
        &self,
        query: &[f32],
        collection: Collection,
        top_k: Option<usize>,
    ) -> Result<Vec<SimilarityResult<'_>>, DomainError> {
        let documents = self.store.load(collection)?;
        let query = self.prepare_query(query)?;

        let mut results: Vec<SimilarityResult<'_>> = documents
            .iter()
            .map(|document| SimilarityResult {
                document,
                score: query.cosine(&document.vector),
            })
            .collect();

        // sort_by is stable, so ties stay in insertion order
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        if let Some(k) = top_k {
            results.truncate(k);
        }
        Ok(results)
    }
}
