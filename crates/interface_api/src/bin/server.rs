//! Claims AI Validation - API Server Binary
//!
//! This binary starts the HTTP API server for AI claim validation.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration (mock AI, in-memory storage)
//! cargo run --bin claims-api
//!
//! # Run against OpenAI with persistent storage
//! CLAIMS_USE_MOCK_AI=false CLAIMS_OPENAI_API_KEY=sk-... \
//! CLAIMS_DOCUMENT_ROOT=./data CLAIMS_DATABASE_URL=postgres://... cargo run --bin claims-api
//! ```
//!
//! # Environment Variables
//!
//! * `CLAIMS_HOST` - Server host (default: 0.0.0.0)
//! * `CLAIMS_PORT` - Server port (default: 8080)
//! * `CLAIMS_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `CLAIMS_LOG_FORMAT` - json or pretty (default: json)
//! * `CLAIMS_USE_MOCK_AI` - Use scenario-driven mock providers (default: true)
//! * `CLAIMS_OPENAI_API_KEY` - Required when mock AI is off
//! * `CLAIMS_MAX_DEMO_BUDGET_USD` - Per-session budget ceiling (default: 50)
//! * `CLAIMS_DOCUMENT_ROOT` - Directory for claim documents (default: in memory)
//! * `CLAIMS_DATABASE_URL` - PostgreSQL metadata store (default: in memory)
//!
//! `RUST_LOG` overrides the configured log level.

use std::net::SocketAddr;

use anyhow::Context;
use interface_api::config::{ApiConfig, LogFormat};
use interface_api::{create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// Loads configuration, initializes logging, wires the adapters and starts
/// the HTTP server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("loading configuration")?;

    init_tracing(&config);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        use_mock_ai = config.use_mock_ai,
        max_demo_budget_usd = config.max_demo_budget_usd,
        "Starting Claims AI Validation API Server"
    );

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    let state = AppState::from_config(config)
        .await
        .context("initializing application state")?;
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.tracing_level()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
