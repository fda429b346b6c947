use anyhow::Result;
use clap::{Parser, Subcommand};
use indexer::{load_config, load_text_dir};
use search_core::{Engine, IdfPolicy};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Load a folder of text files and query it with TF-IDF", long_about = None)]
struct Cli {
    /// Directory of .txt documents
    #[arg(long, default_value = "./data")]
    data: PathBuf,
    /// Engine config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Drop common English words
    #[arg(long, default_value_t = false)]
    english_stopwords: bool,
    /// Use IDF = ln(N/df) instead of the smoothed ln(1 + N/df)
    #[arg(long, default_value_t = false)]
    plain_idf: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank documents against a query and print the hits as JSON
    Search {
        #[arg(long, short)]
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Print corpus and index statistics as JSON
    Stats,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    config.english_stopwords |= cli.english_stopwords;
    if cli.plain_idf {
        config.idf = IdfPolicy::Plain;
    }
    let engine = Engine::new(config);
    let report = load_text_dir(&engine, &cli.data)?;

    match cli.command {
        Commands::Search { query, top_k } => {
            let hits = engine.search(&query, top_k);
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "query": query, "results": hits }))?);
        }
        Commands::Stats => {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "status": engine.status(), "load": report }))?);
        }
    }
    engine.teardown();
    Ok(())
}
