pub mod embeddings;
pub mod legacy;
pub mod sqlite;
