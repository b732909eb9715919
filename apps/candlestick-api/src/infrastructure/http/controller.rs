//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to the candlestick use case.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::application::ports::MarketDataPort;
use crate::application::use_cases::{
    CandlestickQuery, DEFAULT_DURATION, DEFAULT_TIMEFRAME, GetCandlesticksUseCase,
};
use crate::domain::candlesticks::NormalizedBar;
use crate::infrastructure::config::CorsSettings;
use crate::infrastructure::metrics::{self, RequestOutcome};

use super::cors::build_cors_layer;
use super::error::ApiError;
use super::response::{HealthResponse, SuccessEnvelope};

/// Application state shared across handlers.
pub struct AppState<M>
where
    M: MarketDataPort + ?Sized,
{
    /// Use case for fetching candlesticks.
    pub candlesticks: Arc<GetCandlesticksUseCase<M>>,
    /// Application version.
    pub version: String,
}

impl<M> Clone for AppState<M>
where
    M: MarketDataPort + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            candlesticks: Arc::clone(&self.candlesticks),
            version: self.version.clone(),
        }
    }
}

/// Query parameters of the candlestick endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CandlestickParams {
    /// Bar interval code.
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    /// Lookback window code.
    #[serde(default = "default_duration")]
    pub duration: String,
}

fn default_timeframe() -> String {
    DEFAULT_TIMEFRAME.to_string()
}

fn default_duration() -> String {
    DEFAULT_DURATION.to_string()
}

/// Create the HTTP router with all endpoints.
pub fn create_router<M>(state: AppState<M>, cors: &CorsSettings) -> Router
where
    M: MarketDataPort + ?Sized + 'static,
{
    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .route("/healthz", get(liveness))
        .route("/metrics", get(metrics_handler))
        .route("/api/stocks/{symbol}/candlesticks", get(get_candlesticks))
        .route("/api/stocks/{symbol}/candlesticks/", get(get_candlesticks))
        .with_state(state)
        .layer(build_cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

/// Root greeting.
async fn hello() -> impl IntoResponse {
    Json(SuccessEnvelope::new("hello"))
}

/// Health check endpoint.
async fn health_check<M>(State(state): State<AppState<M>>) -> impl IntoResponse
where
    M: MarketDataPort + ?Sized,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn metrics_handler() -> impl IntoResponse {
    metrics::get_metrics_handle().map_or_else(
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [("content-type", "text/plain")],
                "Metrics not initialized".to_string(),
            )
        },
        |handle| {
            let body = handle.render();
            (
                StatusCode::OK,
                [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
                body,
            )
        },
    )
}

/// Candlesticks for a symbol.
async fn get_candlesticks<M>(
    State(state): State<AppState<M>>,
    Path(symbol): Path<String>,
    params: Result<Query<CandlestickParams>, QueryRejection>,
) -> Result<Json<SuccessEnvelope<Vec<NormalizedBar>>>, ApiError>
where
    M: MarketDataPort + ?Sized,
{
    let Query(params) = params
        .map_err(ApiError::from)
        .inspect_err(|e| metrics::record_request(e.outcome()))?;

    let query = CandlestickQuery::new(symbol)
        .with_timeframe(params.timeframe)
        .with_duration(params.duration);

    match state.candlesticks.execute(&query).await {
        Ok(bars) => {
            metrics::record_request(if bars.is_empty() {
                RequestOutcome::Empty
            } else {
                RequestOutcome::Success
            });
            metrics::record_bars_returned(bars.len());
            Ok(Json(SuccessEnvelope::new(bars)))
        }
        Err(e) => {
            let error = ApiError::from(e);
            metrics::record_request(error.outcome());
            Err(error)
        }
    }
}
