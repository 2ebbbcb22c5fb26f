//! songbook-server - song catalog HTTP service
//!
//! Startup order: `.env`, command line, configuration resolution, logging,
//! database bootstrap, then the HTTP server with graceful shutdown.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use songbook_common::config::{CliOverrides, ConfigResolver};
use songbook_server::{build_router, services::MetadataClient, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for songbook-server
#[derive(Parser, Debug)]
#[command(name = "songbook-server")]
#[command(about = "Song catalog service with lyrics pagination")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SONGBOOK_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "SONGBOOK_HOST")]
    host: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "SONGBOOK_DATABASE")]
    database: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "SONGBOOK_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the song metadata provider
    #[arg(long, env = "SONGBOOK_METADATA_API_URL")]
    metadata_api_url: Option<String>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            config_file: args.config,
            database: args.database,
            host: args.host,
            port: args.port,
            metadata_api_url: args.metadata_api_url,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal outside development
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = ConfigResolver::new(args.into())
        .resolve()
        .context("Failed to resolve configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{},tower_http=debug", config.log_directive()).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting songbook-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!("Database path: {}", config.database_path.display());
    info!("Metadata provider: {}", config.metadata_api_url);
    info!("Verse separator: {}", config.verse_separator);

    let pool = songbook_common::db::init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    info!("Database ready");

    let metadata = MetadataClient::new(&config.metadata_api_url)
        .context("Failed to build metadata client")?;

    let app = build_router(AppState::new(pool.clone(), metadata, config.verse_separator));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
