//! Reader for the column-oriented JSON embedding files written by the
//! earlier ingestion tooling (`faq_embeddings.json`,
//! `filmes_embeddings.json`, `feedbacks_embeddings.json`).

use crate::domain::entities::document::{Document, DocumentKind};
use crate::domain::error::DomainError;
use crate::domain::values::collection::Collection;
use crate::domain::values::embedding::EmbeddingVector;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

#[derive(Deserialize)]
#[serde(tag = "tipo", rename_all = "lowercase")]
enum LegacyFile {
    Faq {
        perguntas: Vec<String>,
        respostas: Vec<String>,
        fontes: Vec<String>,
        embeddings: Vec<Vec<f32>>,
    },
    Filmes {
        titulos: Vec<String>,
        descricoes: Vec<String>,
        embeddings: Vec<Vec<f32>>,
    },
    Avaliacoes {
        ids: Vec<Value>,
        usuarios: Vec<String>,
        datas: Vec<String>,
        textos: Vec<String>,
        embeddings: Vec<Vec<f32>>,
    },
}

pub fn read_legacy_file(path: &Path) -> Result<(Collection, Vec<Document>), DomainError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| DomainError::InvalidInput(format!("cannot read {}: {e}", path.display())))?;
    parse_legacy(&raw)
}

/// Parse one legacy file into documents, normalizing every stored vector.
pub fn parse_legacy(raw: &str) -> Result<(Collection, Vec<Document>), DomainError> {
    let file: LegacyFile = serde_json::from_str(raw)?;
    match file {
        LegacyFile::Faq {
            perguntas,
            respostas,
            fontes,
            embeddings,
        } => {
            same_length("faq", embeddings.len(), &[perguntas.len(), respostas.len(), fontes.len()])?;
            let mut per_source: HashMap<String, usize> = HashMap::new();
            let documents = perguntas
                .into_iter()
                .zip(respostas)
                .zip(fontes)
                .zip(embeddings)
                .map(|(((question, answer), source), raw)| -> Result<Document, DomainError> {
                    let n = per_source.entry(source.clone()).or_default();
                    *n += 1;
                    Ok(Document::new(
                        format!("{source}-{n}"),
                        answer,
                        DocumentKind::Faq { question, source },
                        EmbeddingVector::normalize(raw)?,
                    ))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((Collection::Faq, documents))
        }
        LegacyFile::Filmes {
            titulos,
            descricoes,
            embeddings,
        } => {
            same_length("filmes", embeddings.len(), &[titulos.len(), descricoes.len()])?;
            let documents = titulos
                .into_iter()
                .zip(descricoes)
                .zip(embeddings)
                .enumerate()
                .map(|(i, ((title, description), raw))| -> Result<Document, DomainError> {
                    Ok(Document::new(
                        format!("movie-{}", i + 1),
                        description,
                        DocumentKind::Movie { title },
                        EmbeddingVector::normalize(raw)?,
                    ))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((Collection::Movie, documents))
        }
        LegacyFile::Avaliacoes {
            ids,
            usuarios,
            datas,
            textos,
            embeddings,
        } => {
            same_length(
                "avaliacoes",
                embeddings.len(),
                &[ids.len(), usuarios.len(), datas.len(), textos.len()],
            )?;
            let documents = ids
                .into_iter()
                .zip(usuarios)
                .zip(datas)
                .zip(textos)
                .zip(embeddings)
                .map(|((((id, user), date), text), raw)| -> Result<Document, DomainError> {
                    Ok(Document::new(
                        value_to_id(id),
                        text,
                        DocumentKind::Feedback {
                            user: Some(user),
                            date: Some(date),
                        },
                        EmbeddingVector::normalize(raw)?,
                    ))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((Collection::Feedback, documents))
        }
    }
}

fn same_length(kind: &str, expected: usize, lengths: &[usize]) -> Result<(), DomainError> {
    if lengths.iter().any(|&l| l != expected) {
        return Err(DomainError::Parse(format!(
            "{kind}: column lengths {lengths:?} do not match {expected} embeddings"
        )));
    }
    Ok(())
}

fn value_to_id(v: Value) -> String {
    match v {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
