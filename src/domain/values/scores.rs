use crate::domain::entities::document::Document;
use crate::domain::values::relevance::Relevance;
use serde::Serialize;

/// One document scored against a query. `score` is cosine similarity.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimilarityResult<'a> {
    pub document: &'a Document,
    pub score: f32,
}

/// A similarity result annotated for display.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RankedMatch<'a> {
    pub rank: usize,
    #[serde(flatten)]
    pub result: SimilarityResult<'a>,
    pub relevance: Relevance,
}

/// Mean similarity of a document to every other document in its collection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AnomalyScore<'a> {
    pub document: &'a Document,
    pub mean_similarity: f32,
}
