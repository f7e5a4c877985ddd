use crate::application::vector_store::VectorStore;
use crate::domain::error::DomainError;
use crate::domain::values::collection::Collection;
use crate::domain::values::embedding::cosine;
use crate::domain::values::scores::AnomalyScore;
use rayon::prelude::*;
use std::sync::Arc;

/// Flags the documents least similar, on average, to the rest of their
/// collection.
pub struct AnomalyScorer {
    store: Arc<VectorStore>,
    parallel: bool,
}

impl AnomalyScorer {
    pub fn new(store: Arc<VectorStore>, parallel: bool) -> Self {
        Self { store, parallel }
    }

    /// The `top_k` lowest mean similarities of `collection`, most anomalous
    /// first. Collections no larger than `top_k` come back whole.
    pub fn detect_anomalies(
        &self,
        collection: Collection,
        top_k: usize,
    ) -> Result<Vec<AnomalyScore<'_>>, DomainError> {
        let documents = self.store.load(collection)?;
        if documents.len() < 2 {
            return Err(DomainError::InsufficientData {
                collection,
                found: documents.len(),
                required: 2,
            });
        }

        tracing::debug!(%collection, documents = documents.len(), parallel = self.parallel, "scoring anomalies");
        let vectors: Vec<&[f32]> = documents.iter().map(|d| d.vector.as_slice()).collect();
        let means = mean_similarities(&vectors, self.parallel);

        let mut scores: Vec<AnomalyScore<'_>> = documents
            .iter()
            .zip(means)
            .map(|(document, mean_similarity)| AnomalyScore {
                document,
                mean_similarity,
            })
            .collect();
        scores.sort_by(|a, b| a.mean_similarity.total_cmp(&b.mean_similarity));
        scores.truncate(top_k);
        Ok(scores)
    }
}

/// Row means of the pairwise similarity matrix with the diagonal left out.
///
/// Each row is independent, so the parallel path just hands disjoint row
/// indices to the rayon pool. Requires `vectors.len() >= 2`.
pub fn mean_similarities(vectors: &[&[f32]], parallel: bool) -> Vec<f32> {
    if parallel {
        (0..vectors.len())
            .into_par_iter()
            .map(|i| row_mean(vectors, i))
            .collect()
    } else {
        (0..vectors.len()).map(|i| row_mean(vectors, i)).collect()
    }
}

fn row_mean(vectors: &[&[f32]], row: usize) -> f32 {
    let me = vectors[row];
    let sum: f64 = vectors
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != row)
        .map(|(_, other)| cosine(me, other) as f64)
        .sum();
    (sum / (vectors.len() - 1) as f64) as f32
}
