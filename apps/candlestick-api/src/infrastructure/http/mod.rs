//! HTTP/REST API adapter.
//!
//! Inbound adapter exposing candlesticks over axum, plus the health and
//! metrics endpoints.

mod controller;
mod cors;
mod error;
mod response;
mod server;

pub use controller::{AppState, CandlestickParams, create_router};
pub use cors::build_cors_layer;
pub use error::ApiError;
pub use response::{ErrorEnvelope, HealthResponse, SuccessEnvelope};
pub use server::{HttpServer, ServerError};
