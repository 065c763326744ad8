//! dex-catalog - catalog browsing service
//!
//! Resolves configuration (CLI > environment > TOML file > defaults), sets up
//! tracing, and serves the catalog API until Ctrl+C or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use dex_catalog::{build_router, AppState, Catalog};
use dex_common::config::{Overrides, TomlConfig};
use dex_common::logging::init_tracing;

/// Command-line arguments for dex-catalog
#[derive(Parser, Debug)]
#[command(name = "dex-catalog")]
#[command(about = "Paginated, sortable, searchable catalog over a REST collection")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "DEX_CONFIG")]
    config: Option<PathBuf>,

    /// Upstream API base URL
    #[arg(long, env = "DEX_UPSTREAM_URL")]
    upstream_url: Option<String>,

    /// Largest record id surfaced
    #[arg(long, env = "DEX_MAX_ID")]
    max_id: Option<u32>,

    /// Records per page
    #[arg(long, env = "DEX_PAGE_SIZE")]
    page_size: Option<u32>,

    /// Address to bind
    #[arg(long, env = "DEX_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "DEX_PORT")]
    port: Option<u16>,

    /// Log level or filter directive
    #[arg(long, env = "DEX_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print the resolved configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.upstream_url.clone(),
            max_id: self.max_id,
            page_size: self.page_size,
            host: self.host.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::resolve(args.config.as_deref(), &args.overrides())
        .context("Failed to resolve configuration")?;

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    init_tracing(&config.logging).context("Failed to initialise logging")?;

    // Build identification first, before any upstream traffic
    info!(
        "Starting dex-catalog v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let catalog = Catalog::from_config(&config).context("Failed to build upstream client")?;
    let app = build_router(AppState::new(Arc::new(catalog)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("dex-catalog listening on http://{}", addr);
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
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install terminate handler: {}", e);
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
