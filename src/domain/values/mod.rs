pub mod collection;
pub mod embedding;
pub mod relevance;
pub mod scores;
