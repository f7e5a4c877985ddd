//! Shared test helpers.
#![allow(dead_code)]

use semsearch::application::vector_store::VectorStore;
use semsearch::config::EngineConfig;
use semsearch::domain::entities::document::{Document, DocumentKind};
use semsearch::domain::error::DomainError;
use semsearch::domain::ports::embedding_port::{EmbeddingProvider, InputType};
use semsearch::domain::values::collection::Collection;
use semsearch::domain::values::embedding::EmbeddingVector;
use std::collections::HashMap;
use std::sync::Arc;

pub const DIM: usize = 384;

/// Sparse builder: `raw(&[(0, 1.0), (5, 0.2)])` is e0 + 0.2·e5.
pub fn raw(components: &[(usize, f32)]) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    for (i, x) in components {
        v[*i] += *x;
    }
    v
}

pub fn unit(components: &[(usize, f32)]) -> EmbeddingVector {
    EmbeddingVector::normalize(raw(components)).unwrap()
}

pub fn faq(id: &str, source: &str, question: &str, components: &[(usize, f32)]) -> Document {
    Document::new(
        id,
        format!("answer to {question}"),
        DocumentKind::Faq {
            question: question.to_string(),
            source: source.to_string(),
        },
        unit(components),
    )
}

pub fn movie(id: &str, title: &str, components: &[(usize, f32)]) -> Document {
    Document::new(
        id,
        format!("{title} description"),
        DocumentKind::Movie { title: title.to_string() },
        unit(components),
    )
}

pub fn feedback(id: &str, components: &[(usize, f32)]) -> Document {
    Document::new(
        id,
        format!("feedback {id}"),
        DocumentKind::Feedback {
            user: Some("tester".into()),
            date: Some("2024-05-01".into()),
        },
        unit(components),
    )
}

pub fn store(collections: Vec<(Collection, Vec<Document>)>) -> Arc<VectorStore> {
    let mut store = VectorStore::new(&EngineConfig::default());
    for (collection, docs) in collections {
        store = store.with_collection(collection, docs).unwrap();
    }
    Arc::new(store)
}

/// 97 documents around e0 plus three orthogonal outliers at positions 13,
/// 57 and 88.
pub fn clustered_feedback() -> Vec<Document> {
    (0..100)
        .map(|i| {
            let id = format!("fb-{i}");
            match i {
                13 => feedback(&id, &[(300, 1.0)]),
                57 => feedback(&id, &[(301, 1.0)]),
                88 => feedback(&id, &[(302, 1.0)]),
                _ => feedback(&id, &[(0, 1.0), (1 + i % 40, 0.1)]),
            }
        })
        .collect()
}

/// Embedder with a fixed text → vector table. Unknown texts are an error.
pub struct FixtureEmbedder {
    table: HashMap<String, Vec<f32>>,
}

impl FixtureEmbedder {
    pub fn new(entries: &[(&str, Vec<f32>)]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(text, v)| (text.to_string(), v.clone()))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for FixtureEmbedder {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        texts
            .iter()
            .map(|t| {
                self.table
                    .get(t)
                    .cloned()
                    .ok_or_else(|| DomainError::Embedding(format!("no fixture for '{t}'")))
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

/// Drops the last vector of every batch.
pub struct LossyEmbedder;

#[async_trait::async_trait]
impl EmbeddingProvider for LossyEmbedder {
    async fn embed(&self, texts: &[String], _input_type: InputType) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().skip(1).map(|_| raw(&[(0, 1.0)])).collect())
    }

    fn dimension(&self) -> usize {
        DIM
    }
}
