//! examforged — training content daemon.
//!
//! Serves the [`TrainingContentService`](examforge::TrainingContentService)
//! over HTTP so every client shares one cache and one request queue.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use examforge::server::config::{Config, Secrets};
use examforge::server::{AppState, StaticTokenVerifier, router};
use examforge::{ExamForge, ForgeError};

/// examforged — exam-preparation content service.
#[derive(Parser)]
#[command(name = "examforged")]
#[command(version = examforge::PKG_VERSION)]
#[command(about = "Training content generation daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Override the listen address from the configuration file.
    #[arg(long, env = "EXAMFORGE_ADDRESS")]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let tokens = secrets.auth_tokens();
    if tokens.is_empty() {
        warn!("no auth tokens configured, every generation request will be rejected");
    }
    let verifier = Arc::new(StaticTokenVerifier::new(tokens));

    let service = ExamForge::builder()
        .threads((&config.assistant).into())
        .retry((&config.retry).into())
        .cache((&config.cache).into())
        .queue((&config.queue).into())
        .build()?;

    let address = args.address.unwrap_or(config.server.address);
    let addr: SocketAddr = address
        .parse()
        .map_err(|e| ForgeError::Configuration(format!("Invalid address: {e}")))?;

    info!(version = examforge::PKG_VERSION, %addr, "examforged starting");

    let app = router(AppState::new(Arc::new(service), verifier));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
