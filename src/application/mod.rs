pub mod anomalies;
pub mod ingest;
pub mod query;
pub mod similarity_index;
pub mod stats;
pub mod vector_store;
