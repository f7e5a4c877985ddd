use crate::domain::error::DomainError;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS collections (
            name TEXT PRIMARY KEY,
            ingested_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL,
            collection TEXT NOT NULL REFERENCES collections(name),
            text TEXT NOT NULL,
            metadata TEXT NOT NULL,
            vector BLOB NOT NULL,
            UNIQUE (collection, id)
        );

        CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, seq);
        "
    ).map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
