//! inertia-server
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser / navigation client
//!         │  GET /users?q=ali           (X-Inertia, X-Inertia-Version)
//!         ▼
//!     ┌──────────────────────────────────────────────────────┐
//!     │ http::server   request id → trace → limit → timeout  │
//!     │      │                                               │
//!     │      ▼                                               │
//!     │ app::*         handler builds Page { component, props }
//!     │      │                                               │
//!     │      ▼                                               │
//!     │ inertia::render                                      │
//!     │   stale version?  → 409 + X-Inertia-Location         │
//!     │   partial reload? → filter props before resolving    │
//!     │   resolve lazy props concurrently                    │
//!     │   protocol request → JSON page object                │
//!     │   otherwise        → template with data-page         │
//!     └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use inertia_server::config::loader::{apply_env_overrides, load_config, APP_ENV};
use inertia_server::config::validation::validate_config;
use inertia_server::config::{ConfigError, ServerConfig};
use inertia_server::lifecycle::{signals, startup, Shutdown};
use inertia_server::observability::{logging, metrics};
use inertia_server::HttpServer;

#[derive(Parser)]
#[command(name = "inertia-server")]
#[command(about = "Server-driven page rendering with partial reloads", long_about = None)]
struct Args {
    /// TOML config file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn resolve_config(path: Option<&PathBuf>) -> Result<ServerConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = ServerConfig::default();
            apply_env_overrides(&mut config, std::env::var(APP_ENV).ok().as_deref());
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(args.config.as_ref())?;

    logging::init_logging(&config.observability);
    tracing::info!("inertia-server v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mode = ?config.inertia.mode,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let state = startup::build_state(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, state);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
