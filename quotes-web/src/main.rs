//! quotes-web - Weighted random quote server
//!
//! Serves a randomly selected quote (weighted by viewer feedback), accepts
//! likes and dislikes, and hosts the forms for adding sources and quotes.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use quotes_common::admission::AdmissionPolicy;
use quotes_common::config::{database_path, load_config, resolve_root_folder, ROOT_FOLDER_ENV};
use quotes_common::db::init::init_database;
use quotes_web::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "quotes_web=info,quotes_common=info,tower_http=info";

/// Command-line arguments for quotes-web
#[derive(Parser, Debug)]
#[command(name = "quotes-web")]
#[command(about = "Weighted random quote server")]
#[command(version)]
struct Args {
    /// Port to listen on (default 8000)
    #[arg(short, long, env = "QUOTES_PORT")]
    port: Option<u16>,

    /// Address to bind (default 127.0.0.1)
    #[arg(long, env = "QUOTES_HOST")]
    host: Option<String>,

    /// Folder holding quotes.db (also read from QUOTES_ROOT_FOLDER)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Path to config.toml
    #[arg(short, long, env = "QUOTES_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing starts so it can pick the log level;
    // a load error is reported once logging is up.
    let config = load_config(args.config.as_deref());
    let log_filter = config
        .as_ref()
        .ok()
        .and_then(|c| c.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting quotes-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = config.context("Failed to load configuration")?;

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV, &config);
    let db_path = database_path(&root_folder);
    info!("Database path: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e).context("Database initialization failed");
        }
    };

    let mut policy = AdmissionPolicy::default();
    if let Some(min_len) = config.min_quote_len {
        policy.min_text_len = min_len;
    }
    info!("Minimum quote length: {} characters", policy.min_text_len);

    let state = AppState::new(pool, policy, config.session_ttl());
    let app = build_router(state);

    let host = args
        .host
        .or(config.host)
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = args.port.or(config.port).unwrap_or(8000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("quotes-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
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
            info!("Received SIGTERM, shutting down");
        },
    }
}
