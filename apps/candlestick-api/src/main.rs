//! Candlestick API Binary
//!
//! Starts the candlestick HTTP service.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin candlestick-api
//! ```
//!
//! # Environment Variables
//!
//! All optional.
//! - `HTTP_HOST`: Interface to bind (default: 0.0.0.0)
//! - `HTTP_PORT`: HTTP port (default: 8000)
//! - `YAHOO_BASE_URL`: Chart API host (default: <https://query1.finance.yahoo.com>)
//! - `UPSTREAM_TIMEOUT_SECS`: Per-request upstream timeout (default: 10)
//! - `UPSTREAM_MAX_ATTEMPTS`: Attempts per upstream fetch (default: 1)
//! - `UPSTREAM_USER_AGENT`: `User-Agent` sent upstream
//! - `CORS_ALLOWED_ORIGINS` / `CORS_ALLOWED_METHODS` / `CORS_ALLOWED_HEADERS`:
//!   Comma-separated lists or `*` (default: `*`)
//! - `CORS_ALLOW_CREDENTIALS`: true | false (default: true)
//! - `OTEL_ENABLED`: Enable OpenTelemetry (default: false)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (default: <http://localhost:4317>)
//! - `OTEL_SERVICE_NAME`: Service name (default: candlestick-api)
//! - `RUST_LOG`: Log filter (default: info)

use std::sync::Arc;
use std::time::Duration;

use candlestick_api::infrastructure::telemetry;
use candlestick_api::{
    AppState, GetCandlesticksUseCase, HttpServer, ServiceConfig, YahooChartAdapter, YahooConfig,
    create_router, init_metrics,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

/// Graceful shutdown timeout.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    // Initialize telemetry (tracing + optional OpenTelemetry)
    let _telemetry_guard = telemetry::init();

    tracing::info!("Starting Candlestick API");

    // Initialize Prometheus metrics
    let _metrics_handle = init_metrics();

    let config = ServiceConfig::from_env()?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    let adapter = Arc::new(YahooChartAdapter::new(&YahooConfig::from(&config.upstream))?);
    let candlesticks = Arc::new(GetCandlesticksUseCase::new(adapter));

    let state = AppState {
        candlesticks,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let router = create_router(state, &config.cors);

    let server = HttpServer::new(config.bind_address(), router, shutdown_token.clone());
    let listener = server.bind().await?;
    let mut server_task = tokio::spawn(server.serve(listener));

    tracing::info!("Candlestick API ready");

    tokio::select! {
        () = await_shutdown(shutdown_token) => {
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut server_task).await {
                Ok(joined) => joined??,
                Err(_) => tracing::warn!(
                    timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
                    "Graceful shutdown timed out, dropping open connections"
                ),
            }
        }
        joined = &mut server_task => {
            joined??;
            tracing::warn!("HTTP server exited without a shutdown signal");
        }
    }

    tracing::info!("Candlestick API stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_err() {
        load_dotenv_from_ancestors();
    }
}

/// Log the parsed configuration.
fn log_config(config: &ServiceConfig) {
    tracing::info!(
        bind_address = %config.bind_address(),
        upstream = %config.upstream.base_url,
        timeout_secs = config.upstream.timeout.as_secs(),
        max_attempts = config.upstream.max_attempts,
        "Configuration loaded"
    );
    tracing::debug!(
        origins = ?config.cors.allowed_origins,
        methods = ?config.cors.allowed_methods,
        headers = ?config.cors.allowed_headers,
        credentials = config.cors.allow_credentials,
        "CORS policy"
    );
}

/// Load .env file from any ancestor directory.
fn load_dotenv_from_ancestors() {
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();

    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "Graceful shutdown started"
    );
}
