//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer, plus the HTTP surface.

/// Configuration loading.
pub mod config;

/// HTTP API, health and metrics endpoints.
pub mod http;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// OpenTelemetry tracing integration.
pub mod telemetry;

/// Yahoo Finance chart adapter.
pub mod yahoo;
