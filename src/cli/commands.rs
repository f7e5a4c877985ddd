use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "semsearch", about = "Semantic search and outlier detection over embedded documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the FAQ answers closest to a question
    Faq {
        query: String,
        /// Number of answers (defaults to SEMSEARCH_TOP_K or 3)
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Rank every movie against a description
    Movies { query: String },
    /// List the documents least similar to the rest of their collection
    Anomalies {
        /// Collection to scan (faq, movie, feedback)
        #[arg(long, default_value = "feedback")]
        collection: String,
        /// Number of outliers (defaults to SEMSEARCH_ANOMALY_TOP_K or 3)
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Embed records from a JSON array of {id?, text, metadata} and store them
    Ingest {
        /// Collection (faq, movie, feedback)
        collection: String,
        /// Path to the JSON records file
        file: String,
    },
    /// Import a pre-computed embeddings file (faq/filmes/avaliacoes format)
    Import { file: String },
    /// Show per-collection document counts
    Stats,
}
