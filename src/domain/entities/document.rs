use crate::domain::error::DomainError;
use crate::domain::values::collection::Collection;
use crate::domain::values::embedding::EmbeddingVector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-collection fields. The serde tag doubles as the collection name, so a
/// stored `kind` is enough to recover which collection a row belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "collection", rename_all = "lowercase")]
pub enum DocumentKind {
    /// `text` holds the answer; `source` names the FAQ the pair came from.
    Faq { question: String, source: String },
    /// `text` holds the description.
    Movie { title: String },
    Feedback {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<String>,
    },
}

impl DocumentKind {
    pub fn collection(&self) -> Collection {
        match self {
            DocumentKind::Faq { .. } => Collection::Faq,
            DocumentKind::Movie { .. } => Collection::Movie,
            DocumentKind::Feedback { .. } => Collection::Feedback,
        }
    }

    /// Build the variant for `collection` out of a loose string map, as
    /// supplied by ingestion records.
    pub fn from_metadata(
        collection: Collection,
        metadata: &BTreeMap<String, String>,
    ) -> Result<Self, DomainError> {
        let required = |key: &str| {
            metadata.get(key).cloned().ok_or_else(|| {
                DomainError::InvalidInput(format!("{collection} record is missing metadata field '{key}'"))
            })
        };
        Ok(match collection {
            Collection::Faq => DocumentKind::Faq {
                question: metadata.get("question").cloned().unwrap_or_default(),
                source: required("source")?,
            },
            Collection::Movie => DocumentKind::Movie {
                title: required("title")?,
            },
            Collection::Feedback => DocumentKind::Feedback {
                user: metadata.get("user").cloned(),
                date: metadata.get("date").cloned(),
            },
        })
    }
}

/// An embedded document. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    #[serde(flatten)]
    pub kind: DocumentKind,
    #[serde(skip)]
    pub vector: EmbeddingVector,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>, kind: DocumentKind, vector: EmbeddingVector) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind,
            vector,
        }
    }

    pub fn collection(&self) -> Collection {
        self.kind.collection()
    }

    /// Variant fields flattened to strings (`source`, `question`, `title`,
    /// `user`, `date`).
    pub fn metadata(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        match &self.kind {
            DocumentKind::Faq { question, source } => {
                map.insert("question".to_string(), question.clone());
                map.insert("source".to_string(), source.clone());
            }
            DocumentKind::Movie { title } => {
                map.insert("title".to_string(), title.clone());
            }
            DocumentKind::Feedback { user, date } => {
                if let Some(user) = user {
                    map.insert("user".to_string(), user.clone());
                }
                if let Some(date) = date {
                    map.insert("date".to_string(), date.clone());
                }
            }
        }
        map
    }

    /// Short human label: the FAQ question, movie title or feedback id.
    pub fn label(&self) -> &str {
        match &self.kind {
            DocumentKind::Faq { question, .. } if !question.is_empty() => question,
            DocumentKind::Movie { title } => title,
            _ => &self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> EmbeddingVector {
        EmbeddingVector::normalize(vec![1.0, 0.0]).unwrap()
    }

    #[test]
    fn test_from_metadata_requires_source_for_faq() {
        let empty = BTreeMap::new();
        assert!(DocumentKind::from_metadata(Collection::Faq, &empty).is_err());

        let mut meta = BTreeMap::new();
        meta.insert("source".to_string(), "farmacia".to_string());
        let kind = DocumentKind::from_metadata(Collection::Faq, &meta).unwrap();
        assert_eq!(kind.collection(), Collection::Faq);
    }

    #[test]
    fn test_feedback_metadata_is_optional() {
        let kind = DocumentKind::from_metadata(Collection::Feedback, &BTreeMap::new()).unwrap();
        let doc = Document::new("fb-1", "great service", kind, unit());
        assert!(doc.metadata().is_empty());
        assert_eq!(doc.label(), "fb-1");
    }

    #[test]
    fn test_serialized_shape_carries_collection_tag() {
        let doc = Document::new(
            "movie-1",
            "A crew travels through a wormhole",
            DocumentKind::Movie { title: "Interstellar".into() },
            unit(),
        );
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["collection"], "movie");
        assert_eq!(json["title"], "Interstellar");
        assert!(json.get("vector").is_none());
    }

    #[test]
    fn test_kind_round_trips_through_json() {
        let kind = DocumentKind::Faq {
            question: "1. Qual o prazo?".into(),
            source: "advocacia".into(),
        };
        let s = serde_json::to_string(&kind).unwrap();
        let back: DocumentKind = serde_json::from_str(&s).unwrap();
        assert_eq!(back, kind);
    }
}
