use anyhow::Result;
use axum::Router;
use clap::Parser;
use indexer::{load_config, load_text_dir};
use search_core::Engine;
use server::{build_app, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Directory of .txt documents to load at startup
    #[arg(long)]
    data: Option<PathBuf>,
    /// Engine config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let engine = Engine::new(load_config(args.config.as_deref())?);
    if let Some(dir) = &args.data {
        load_text_dir(&engine, dir)?;
    }
    let app: Router = build_app(AppState::from_env(Arc::new(engine)));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
