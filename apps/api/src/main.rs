mod config;
mod errors;
mod llm_client;
mod models;
mod parsing;
mod render;
mod routes;
mod state;
mod storage;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::parsing::pipeline::parse_resume;
use crate::render::{record_from_value, render_to_file};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::FileStore;

#[derive(Debug, Parser)]
#[command(name = "resume-api", version, about = "Parse résumé PDFs into JSON and re-render them")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service (default).
    Serve,
    /// Parse one PDF and print the recovered JSON to stdout.
    Parse {
        /// Path to a text-based résumé PDF.
        path: PathBuf,
        /// Also render the parsed record to this PDF file.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails fast when the API key is missing)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Initialize LLM client
    let llm = LlmClient::new(&config)?;
    info!(
        "LLM client initialized (model: {}, max_tokens: {})",
        llm.model(),
        config.max_tokens
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, llm).await,
        Command::Parse { path, output } => parse_once(llm, path, output).await,
    }
}

async fn serve(config: Config, llm: LlmClient) -> Result<()> {
    info!("Starting resume API v{}", env!("CARGO_PKG_VERSION"));

    let store = FileStore::new(config.upload_dir.clone(), config.public_base_url.clone());
    store.ensure_root().await?;
    info!("Serving files from {}", store.root().display());

    let state = AppState {
        llm: Arc::new(llm),
        store,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn parse_once(llm: LlmClient, path: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let outcome = parse_resume(&path, &llm)
        .await
        .with_context(|| format!("failed to parse {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let (Some(output), Some(parsed)) = (output, outcome.parsed()) {
        let record = record_from_value(parsed)?;
        render_to_file(&record, &output)?;
        info!("Resume exported to {}", output.display());
    }
    Ok(())
}
