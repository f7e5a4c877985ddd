use crate::domain::entities::document::{Document, DocumentKind};
use crate::domain::error::DomainError;
use crate::domain::ports::document_repository::{CollectionStats, DocumentRepository};
use crate::domain::values::collection::Collection;
use crate::domain::values::embedding::{EmbeddingVector, DEFAULT_NORM_TOLERANCE};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::sync::Mutex;

pub struct SqliteDocumentRepo {
    conn: Mutex<Connection>,
}

impl SqliteDocumentRepo {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, DomainError> {
        self.conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Result<Vec<f32>, DomainError> {
        if bytes.len() % 4 != 0 {
            return Err(DomainError::Parse(format!(
                "vector blob of {} bytes is not a whole number of f32s",
                bytes.len()
            )));
        }
        Ok(bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect())
    }

    fn upsert_collection(conn: &Connection, collection: Collection) -> Result<(), DomainError> {
        conn.execute(
            "INSERT INTO collections (name, ingested_at) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET ingested_at = excluded.ingested_at",
            params![collection.as_str(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn row_to_document(
        collection: Collection,
        id: String,
        text: String,
        metadata: &str,
        blob: &[u8],
    ) -> Result<Document, DomainError> {
        let kind: DocumentKind = serde_json::from_str(metadata)?;
        if kind.collection() != collection {
            return Err(DomainError::Database(format!(
                "document {id} is stored under {collection} but tagged {}",
                kind.collection()
            )));
        }
        let vector = EmbeddingVector::from_unit(Self::deserialize_vector(blob)?, DEFAULT_NORM_TOLERANCE)?;
        Ok(Document::new(id, text, kind, vector))
    }
}

impl DocumentRepository for SqliteDocumentRepo {
    fn add_all(&self, collection: Collection, documents: &[Document]) -> Result<(), DomainError> {
        if let Some(stray) = documents.iter().find(|d| d.collection() != collection) {
            return Err(DomainError::InvalidInput(format!(
                "document {} belongs to {}, not {collection}",
                stray.id,
                stray.collection()
            )));
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        Self::upsert_collection(&tx, collection)?;
        {
            // Upsert keeps `seq`, so replacing a document does not move it.
            let mut stmt = tx.prepare(
                "INSERT INTO documents (id, collection, text, metadata, vector)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(collection, id) DO UPDATE SET
                    text = excluded.text,
                    metadata = excluded.metadata,
                    vector = excluded.vector",
            )?;
            for document in documents {
                let metadata = serde_json::to_string(&document.kind)?;
                stmt.execute(params![
                    document.id,
                    collection.as_str(),
                    document.text,
                    metadata,
                    Self::serialize_vector(document.vector.as_slice()),
                ])
                .map_err(|e| DomainError::Database(format!("Failed to store document {}: {e}", document.id)))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn list(&self, collection: Collection) -> Result<Vec<Document>, DomainError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, text, metadata, vector FROM documents WHERE collection = ?1 ORDER BY seq",
        )?;
        let rows = stmt
            .query_map(params![collection.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Vec<u8>>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, text, metadata, blob)| Self::row_to_document(collection, id, text, &metadata, &blob))
            .collect()
    }

    fn collections(&self) -> Result<Vec<Collection>, DomainError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM collections")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let mut collections = names
            .iter()
            .map(|n| n.parse::<Collection>().map_err(DomainError::Database))
            .collect::<Result<Vec<_>, _>>()?;
        collections.sort();
        Ok(collections)
    }

    fn stats(&self) -> Result<Vec<CollectionStats>, DomainError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT c.name, COUNT(d.id), c.ingested_at
             FROM collections c LEFT JOIN documents d ON d.collection = c.name
             GROUP BY c.name, c.ingested_at",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stats = rows
            .into_iter()
            .map(|(name, count, ingested_at)| -> Result<CollectionStats, DomainError> {
                Ok(CollectionStats {
                    collection: name.parse().map_err(DomainError::Database)?,
                    documents: count as usize,
                    ingested_at,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        stats.sort_by_key(|s| s.collection);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::migrations::run_migrations;

    fn repo() -> SqliteDocumentRepo {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        SqliteDocumentRepo::new(conn)
    }

    fn faq(id: &str, raw: Vec<f32>) -> Document {
        Document::new(
            id,
            "answer",
            DocumentKind::Faq {
                question: "question?".into(),
                source: "farmacia".into(),
            },
            EmbeddingVector::normalize(raw).unwrap(),
        )
    }

    #[test]
    fn test_vector_blob_round_trip() {
        let v = vec![0.25_f32, -1.5, 3.0];
        let bytes = SqliteDocumentRepo::serialize_vector(&v);
        assert_eq!(SqliteDocumentRepo::deserialize_vector(&bytes).unwrap(), v);
        assert!(SqliteDocumentRepo::deserialize_vector(&bytes[..5]).is_err());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let repo = repo();
        repo.add_all(
            Collection::Faq,
            &[faq("b", vec![1.0, 0.0]), faq("a", vec![0.0, 1.0]), faq("c", vec![1.0, 1.0])],
        )
        .unwrap();
        let ids: Vec<String> = repo.list(Collection::Faq).unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_replacing_keeps_position() {
        let repo = repo();
        repo.add_all(Collection::Faq, &[faq("a", vec![1.0, 0.0]), faq("b", vec![0.0, 1.0])])
            .unwrap();
        repo.add_all(Collection::Faq, &[faq("a", vec![0.0, 1.0])]).unwrap();
        let docs = repo.list(Collection::Faq).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "a");
        assert!((docs[0].vector.as_slice()[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_registered_collection_without_documents() {
        let repo = repo();
        repo.add_all(Collection::Movie, &[]).unwrap();
        assert_eq!(repo.collections().unwrap(), vec![Collection::Movie]);
        assert!(repo.list(Collection::Movie).unwrap().is_empty());
        let stats = repo.stats().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].documents, 0);
    }

    #[test]
    fn test_unnormalized_blob_is_rejected_on_read() {
        let repo = repo();
        repo.add_all(Collection::Faq, &[]).unwrap();
        {
            let conn = repo.lock().unwrap();
            conn.execute(
                "INSERT INTO documents (id, collection, text, metadata, vector) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    "bad",
                    "faq",
                    "t",
                    r#"{"collection":"faq","question":"q","source":"s"}"#,
                    SqliteDocumentRepo::serialize_vector(&[2.0, 0.0]),
                ],
            )
            .unwrap();
        }
        let err = repo.list(Collection::Faq).unwrap_err();
        assert!(matches!(err, DomainError::Normalization { .. }));
    }

    fn feedback(id: &str, raw: Vec<f32>) -> Document {
        Document::new(
            id,
            "text",
            DocumentKind::Feedback { user: None, date: None },
            EmbeddingVector::normalize(raw).unwrap(),
        )
    }

    #[test]
    fn test_same_id_in_two_collections_is_two_documents() {
        let repo = repo();
        repo.add_all(Collection::Faq, &[faq("7", vec![1.0, 0.0])]).unwrap();
        repo.add_all(Collection::Feedback, &[feedback("7", vec![0.0, 1.0])]).unwrap();

        let faqs = repo.list(Collection::Faq).unwrap();
        let feedbacks = repo.list(Collection::Feedback).unwrap();
        assert_eq!(faqs.len(), 1);
        assert_eq!(feedbacks.len(), 1);
        assert!((faqs[0].vector.as_slice()[0] - 1.0).abs() < 1e-6);
        assert_eq!(feedbacks[0].collection(), Collection::Feedback);
    }

    #[test]
    fn test_mixed_batch_stores_nothing() {
        let repo = repo();
        let err = repo
            .add_all(Collection::Faq, &[faq("a", vec![1.0, 0.0]), feedback("b", vec![0.0, 1.0])])
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(repo.collections().unwrap().is_empty());
        assert!(repo.list(Collection::Faq).unwrap().is_empty());
    }
}
