//! Prometheus Metrics Module
//!
//! Exposes application metrics via Prometheus format for monitoring.
//!
//! # Metrics Categories
//!
//! - **Requests**: Candlestick requests by outcome
//! - **Upstream**: Provider fetch latency and failures by kind
//! - **Payload**: Bars returned per successful request
//!
//! # Integration
//!
//! Metrics are exposed at `/metrics` on the HTTP port.

use std::sync::OnceLock;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// Subsequent calls return the handle installed by the first one.
///
/// # Panics
///
/// Panics if the recorder cannot be installed.
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let builder = PrometheusBuilder::new();
            #[allow(clippy::expect_used)]
            let handle = builder
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            register_metrics();
            handle
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

// =============================================================================
// Metric Registration
// =============================================================================

fn register_metrics() {
    describe_counter!(
        "candlestick_api_requests_total",
        "Total candlestick requests by outcome"
    );
    describe_counter!(
        "candlestick_api_upstream_errors_total",
        "Total failed provider fetches by error kind"
    );
    describe_histogram!(
        "candlestick_api_upstream_fetch_seconds",
        "Time spent fetching a series from the provider, retries included"
    );
    describe_histogram!(
        "candlestick_api_bars_returned",
        "Number of bars returned per successful request"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Outcome label for a candlestick request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// At least one bar returned.
    Success,
    /// Request succeeded with no bars.
    Empty,
    /// Provider rejected the parameters.
    Rejected,
    /// Provider failed or returned unusable data.
    UpstreamError,
}

impl RequestOutcome {
    /// Label value used in the `outcome` dimension.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Empty => "empty",
            Self::Rejected => "rejected",
            Self::UpstreamError => "upstream_error",
        }
    }
}

/// Record a completed candlestick request.
pub fn record_request(outcome: RequestOutcome) {
    counter!(
        "candlestick_api_requests_total",
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

/// Record how many bars a successful request returned.
#[allow(clippy::cast_precision_loss)]
pub fn record_bars_returned(count: usize) {
    histogram!("candlestick_api_bars_returned").record(count as f64);
}

/// Record provider fetch duration.
pub fn record_upstream_fetch(duration: Duration) {
    histogram!("candlestick_api_upstream_fetch_seconds").record(duration.as_secs_f64());
}

/// Record a failed provider fetch.
pub fn record_upstream_error(kind: &'static str) {
    counter!(
        "candlestick_api_upstream_errors_total",
        "kind" => kind
    )
    .increment(1);
}

// =============================================================================
// Tests
// =============================================================================
