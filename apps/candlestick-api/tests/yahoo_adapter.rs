//! Yahoo Chart Adapter Integration Tests
//!
//! Runs the adapter against a mock chart API.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use candlestick_api::{
    BarNormalizer, MarketDataError, MarketDataPort, RetryConfig, YahooChartAdapter, YahooConfig,
};

fn chart_payload() -> serde_json::Value {
    json!({
        "chart": {
            "result": [{
                "meta": {
                    "symbol": "MSFT",
                    "gmtoffset": -18000,
                    "exchangeTimezoneName": "America/New_York"
                },
                "timestamp": [1_704_205_800, 1_704_205_860, 1_704_205_920],
                "indicators": {
                    "quote": [{
                        "open":   [370.0, null, 370.4],
                        "high":   [371.0, null, 371.2],
                        "low":    [369.5, null, 370.1],
                        "close":  [370.6, null, 370.9],
                        "volume": [12_000, null, 9_000]
                    }]
                }
            }],
            "error": null
        }
    })
}

fn adapter_for(server: &MockServer) -> YahooChartAdapter {
    YahooChartAdapter::new(
        &YahooConfig::new(server.uri()).with_timeout(Duration::from_secs(2)),
    )
    .unwrap()
}

fn retrying_adapter_for(server: &MockServer) -> YahooChartAdapter {
    let retry = RetryConfig {
        max_attempts: 2,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(5),
        multiplier: 2.0,
        jitter_factor: 0.0,
    };
    YahooChartAdapter::new(
        &YahooConfig::new(server.uri())
            .with_timeout(Duration::from_secs(2))
            .with_retry(retry),
    )
    .unwrap()
}

#[tokio::test]
async fn fetches_and_parses_intraday_chart() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/MSFT"))
        .and(query_param("interval", "1m"))
        .and(query_param("range", "1d"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let series = adapter_for(&server)
        .fetch_series("MSFT", "1m", "1d")
        .await
        .unwrap();

    assert_eq!(series.index_label, "Datetime");
    assert_eq!(series.len(), 2);

    let bars = BarNormalizer::normalize(&series).unwrap();
    assert_eq!(bars[0].time, 1_704_205_800);
    assert_eq!(bars[0].open, 370.0);
    assert_eq!(bars[1].time, 1_704_205_920);
    assert_eq!(bars[1].close, 370.9);
}

#[tokio::test]
async fn daily_chart_is_indexed_by_date() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/MSFT"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_payload()))
        .mount(&server)
        .await;

    let series = adapter_for(&server)
        .fetch_series("MSFT", "1d", "1mo")
        .await
        .unwrap();

    assert_eq!(series.index_label, "Date");
    assert_eq!(series.rows[0].index.to_string(), "2024-01-02 00:00:00");
}

#[tokio::test]
async fn not_found_is_empty_series() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        })))
        .mount(&server)
        .await;

    let series = adapter_for(&server)
        .fetch_series("ZZZZ", "1m", "1d")
        .await
        .unwrap();

    assert!(series.is_empty());
}

#[tokio::test]
async fn bad_request_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "chart": {
                "result": null,
                "error": {
                    "code": "Unprocessable Entity",
                    "description": "1m data not available for startTime"
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = retrying_adapter_for(&server)
        .fetch_series("MSFT", "1m", "1y")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        MarketDataError::Rejected {
            code: "Unprocessable Entity".to_string(),
            message: "1m data not available for startTime".to_string(),
        }
    );
}

#[tokio::test]
async fn server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = adapter_for(&server)
        .fetch_series("MSFT", "1m", "1d")
        .await
        .unwrap_err();

    assert!(matches!(err, MarketDataError::UpstreamUnavailable { .. }));
}

#[tokio::test]
async fn rate_limit_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let err = adapter_for(&server)
        .fetch_series("MSFT", "1m", "1d")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        MarketDataError::RateLimited {
            retry_after_secs: Some(7)
        }
    );
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = adapter_for(&server)
        .fetch_series("MSFT", "1m", "1d")
        .await
        .unwrap_err();

    assert!(matches!(err, MarketDataError::InvalidResponse { .. }));
}

#[tokio::test]
async fn transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chart_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let series = retrying_adapter_for(&server)
        .fetch_series("MSFT", "1m", "1d")
        .await
        .unwrap();

    assert_eq!(series.len(), 2);
}

#[tokio::test]
async fn single_attempt_does_not_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = adapter_for(&server).fetch_series("MSFT", "1m", "1d").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn unreachable_provider_is_unavailable() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let adapter = YahooChartAdapter::new(
        &YahooConfig::new(uri).with_timeout(Duration::from_millis(500)),
    )
    .unwrap();
    let err = adapter.fetch_series("MSFT", "1m", "1d").await.unwrap_err();

    assert!(err.is_transient());
    assert!(matches!(err, MarketDataError::UpstreamUnavailable { .. }));
}
