//! Yahoo chart adapter.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::api_types::ChartResponse;
use super::backoff::ExponentialBackoff;
use super::config::{RetryConfig, YahooConfig};
use crate::application::ports::{MarketDataError, MarketDataPort};
use crate::domain::candlesticks::RawSeries;
use crate::infrastructure::metrics;

/// Path of the chart endpoint, relative to the base URL.
const CHART_PATH: [&str; 3] = ["v8", "finance", "chart"];

/// Market data adapter for the Yahoo Finance chart API.
#[derive(Debug, Clone)]
pub struct YahooChartAdapter {
    client: Client,
    base_url: Url,
    retry_config: RetryConfig,
}

impl YahooChartAdapter {
    /// Create a new adapter.
    ///
    /// # Errors
    ///
    /// Returns `MarketDataError::UpstreamUnavailable` if the base URL is
    /// malformed or the HTTP client cannot be built.
    pub fn new(config: &YahooConfig) -> Result<Self, MarketDataError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            MarketDataError::UpstreamUnavailable {
                message: format!("invalid base URL {}: {e}", config.base_url),
            }
        })?;

        if base_url.cannot_be_a_base() {
            return Err(MarketDataError::UpstreamUnavailable {
                message: format!("invalid base URL {}", config.base_url),
            });
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| MarketDataError::UpstreamUnavailable {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url,
            retry_config: config.retry.clone(),
        })
    }

    /// Full chart URL for a symbol; the symbol is percent-encoded as a path segment.
    fn chart_url(&self, symbol: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(CHART_PATH).push(symbol);
        }
        url
    }

    /// One request/response round trip, no retries.
    async fn fetch_once(
        &self,
        url: &Url,
        interval: &str,
        period: &str,
    ) -> Result<RawSeries, AttemptError> {
        let response = self
            .client
            .get(url.clone())
            .query(&[("interval", interval), ("range", period)])
            .send()
            .await
            .map_err(|e| {
                AttemptError::from(MarketDataError::UpstreamUnavailable {
                    message: describe_transport_error(&e),
                })
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response.text().await.map_err(|e| {
            AttemptError::from(MarketDataError::UpstreamUnavailable {
                message: describe_transport_error(&e),
            })
        })?;

        match categorize_status(status) {
            StatusCategory::Success => {
                let chart: ChartResponse = serde_json::from_str(&body).map_err(|e| {
                    AttemptError::from(MarketDataError::InvalidResponse {
                        message: format!("malformed chart payload: {e}"),
                    })
                })?;
                chart.into_raw_series(interval).map_err(AttemptError::from)
            }
            StatusCategory::NotFound => {
                tracing::info!("Provider has no data for symbol");
                Ok(RawSeries::empty())
            }
            StatusCategory::RateLimited => Err(AttemptError {
                error: MarketDataError::RateLimited {
                    retry_after_secs: retry_after,
                },
                retry_after: retry_after.map(Duration::from_secs),
            }),
            StatusCategory::Retryable => {
                Err(AttemptError::from(MarketDataError::UpstreamUnavailable {
                    message: format!("provider returned HTTP {}", status.as_u16()),
                }))
            }
            StatusCategory::Rejected => {
                // Provider errors come back as a chart envelope; anything else
                // is reported by status only.
                let error = serde_json::from_str::<ChartResponse>(&body)
                    .ok()
                    .and_then(|chart| chart.chart.error)
                    .map_or_else(
                        || MarketDataError::Rejected {
                            code: status.as_u16().to_string(),
                            message: format!("provider returned HTTP {}", status.as_u16()),
                        },
                        |e| MarketDataError::Rejected {
                            code: e.code,
                            message: e.description,
                        },
                    );
                Err(AttemptError::from(error))
            }
            StatusCategory::Refused => Err(AttemptError::from(
                MarketDataError::UpstreamUnavailable {
                    message: format!("provider refused access (HTTP {})", status.as_u16()),
                },
            )),
        }
    }
}

#[async_trait]
impl MarketDataPort for YahooChartAdapter {
    #[tracing::instrument(name = "yahoo_fetch_series", skip(self))]
    async fn fetch_series(
        &self,
        symbol: &str,
        interval: &str,
        period: &str,
    ) -> Result<RawSeries, MarketDataError> {
        let url = self.chart_url(symbol);
        let mut backoff = ExponentialBackoff::new(&self.retry_config);
        let started = Instant::now();

        loop {
            match self.fetch_once(&url, interval, period).await {
                Ok(series) => {
                    metrics::record_upstream_fetch(started.elapsed());
                    tracing::debug!(
                        rows = series.len(),
                        attempts = backoff.attempt + 1,
                        elapsed_ms = started.elapsed().as_millis(),
                        "Fetched chart"
                    );
                    return Ok(series);
                }
                Err(attempt) => {
                    let delay = if attempt.error.is_transient() {
                        backoff.next_backoff().map(|computed| {
                            attempt.retry_after.map_or(computed, |d| backoff.clamp(d))
                        })
                    } else {
                        None
                    };

                    if let Some(delay) = delay {
                        tracing::warn!(
                            error = %attempt.error,
                            delay_ms = delay.as_millis(),
                            attempt = backoff.attempt,
                            "Retryable upstream error, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    metrics::record_upstream_fetch(started.elapsed());
                    metrics::record_upstream_error(attempt.error.kind());
                    return Err(attempt.error);
                }
            }
        }
    }
}

/// Outcome of a single failed attempt. Only transient errors are retried.
#[derive(Debug)]
struct AttemptError {
    error: MarketDataError,
    retry_after: Option<Duration>,
}

impl From<MarketDataError> for AttemptError {
    fn from(error: MarketDataError) -> Self {
        Self {
            error,
            retry_after: None,
        }
    }
}

/// Status category for determining retry behavior.
#[derive(Debug, PartialEq, Eq)]
enum StatusCategory {
    Success,
    NotFound,
    RateLimited,
    Retryable,
    Rejected,
    Refused,
}

/// Categorize HTTP status code for retry handling.
const fn categorize_status(status: StatusCode) -> StatusCategory {
    match status.as_u16() {
        200..=299 => StatusCategory::Success,
        404 => StatusCategory::NotFound,
        429 => StatusCategory::RateLimited,
        408 | 500..=599 => StatusCategory::Retryable,
        401 | 403 => StatusCategory::Refused,
        _ => StatusCategory::Rejected,
    }
}

fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request to provider timed out".to_string()
    } else if error.is_connect() {
        "could not connect to provider".to_string()
    } else {
        format!("transport error: {error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_url_encodes_symbol() {
        let adapter = YahooChartAdapter::new(&YahooConfig::new("http://localhost:1234/")).unwrap();

        assert_eq!(
            adapter.chart_url("MSFT").as_str(),
            "http://localhost:1234/v8/finance/chart/MSFT"
        );
        assert_eq!(
            adapter.chart_url("BRK/B").as_str(),
            "http://localhost:1234/v8/finance/chart/BRK%2FB"
        );
        assert_eq!(
            adapter.chart_url("^GSPC").as_str(),
            "http://localhost:1234/v8/finance/chart/%5EGSPC"
        );
    }

    #[test]
    fn chart_url_keeps_base_path() {
        let adapter =
            YahooChartAdapter::new(&YahooConfig::new("http://localhost:1234/proxy")).unwrap();
        assert_eq!(
            adapter.chart_url("MSFT").as_str(),
            "http://localhost:1234/proxy/v8/finance/chart/MSFT"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(YahooChartAdapter::new(&YahooConfig::new("not a url")).is_err());
    }

    #[test]
    fn status_categories() {
        assert_eq!(categorize_status(StatusCode::OK), StatusCategory::Success);
        assert_eq!(categorize_status(StatusCode::NOT_FOUND), StatusCategory::NotFound);
        assert_eq!(
            categorize_status(StatusCode::TOO_MANY_REQUESTS),
            StatusCategory::RateLimited
        );
        assert_eq!(
            categorize_status(StatusCode::BAD_GATEWAY),
            StatusCategory::Retryable
        );
        assert_eq!(
            categorize_status(StatusCode::REQUEST_TIMEOUT),
            StatusCategory::Retryable
        );
        assert_eq!(
            categorize_status(StatusCode::UNAUTHORIZED),
            StatusCategory::Refused
        );
        assert_eq!(
            categorize_status(StatusCode::BAD_REQUEST),
            StatusCategory::Rejected
        );
        assert_eq!(
            categorize_status(StatusCode::UNPROCESSABLE_ENTITY),
            StatusCategory::Rejected
        );
    }
}
