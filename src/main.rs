use clap::Parser;
use semsearch::application::ingest::{ImportUseCase, IngestRecord};
use semsearch::application::stats::StatsUseCase;
use semsearch::cli::commands::{Cli, Commands};
use semsearch::config::EngineConfig;
use semsearch::domain::values::collection::Collection;
use semsearch::infrastructure::legacy::json_import::read_legacy_file;
use semsearch::{embedder_from_env, ingestor, open_repository, SemSearch};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("SEMSEARCH_LOG").unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let db_path = std::env::var("SEMSEARCH_DB").unwrap_or_else(|_| "./semsearch.db".into());

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_command(&db_path, config, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_command(db_path: &str, config: EngineConfig, cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        Commands::Faq { query, top_k } => {
            let engine = SemSearch::new(db_path, config)?;
            let matches = match top_k {
                Some(k) => engine.search_faq_top(&query, k).await?,
                None => engine.search_faq(&query).await?,
            };
            println!("{}", serde_json::to_string_pretty(&matches)?);
        }
        Commands::Movies { query } => {
            let engine = SemSearch::new(db_path, config)?;
            let ranked = engine.rank_movies(&query).await?;
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Commands::Anomalies { collection, top_k } => {
            let collection: Collection = collection.parse().map_err(|e: String| e)?;
            let engine = SemSearch::new(db_path, config)?;
            let anomalies = engine.detect_anomalies(collection, top_k)?;
            println!("{}", serde_json::to_string_pretty(&anomalies)?);
        }
        Commands::Ingest { collection, file } => {
            let collection: Collection = collection.parse().map_err(|e: String| e)?;
            let raw = std::fs::read_to_string(&file)?;
            let records: Vec<IngestRecord> = serde_json::from_str(&raw)?;
            let repo = open_repository(db_path)?;
            let embedder = embedder_from_env(&config);
            let count = ingestor(repo, embedder, &config).ingest(collection, records).await?;
            println!("Ingested {count} documents into {collection}");
        }
        Commands::Import { file } => {
            let (collection, documents) = read_legacy_file(Path::new(&file))?;
            let count = ImportUseCase::new(open_repository(db_path)?).import(collection, &documents)?;
            println!("Imported {count} documents into {collection}");
        }
        Commands::Stats => {
            let stats = StatsUseCase::new(open_repository(db_path)?).stats()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }
    Ok(())
}
