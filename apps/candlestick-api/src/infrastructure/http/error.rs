//! API error mapping.

use axum::extract::rejection::QueryRejection;
use axum::{Json, http::StatusCode, response::IntoResponse};

use super::response::ErrorEnvelope;
use crate::application::ports::MarketDataError;
use crate::application::use_cases::CandlestickError;
use crate::domain::candlesticks::BarError;
use crate::infrastructure::metrics::RequestOutcome;

/// Request failure rendered as an error envelope.
#[derive(Debug)]
pub enum ApiError {
    /// The query string could not be decoded.
    InvalidQuery(String),
    /// Fetching or normalizing candlesticks failed.
    Candlesticks(CandlestickError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidQuery(_)
            | Self::Candlesticks(CandlestickError::Upstream(MarketDataError::Rejected { .. })) => {
                StatusCode::BAD_REQUEST
            }
            Self::Candlesticks(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Metrics outcome for this error.
    #[must_use]
    pub const fn outcome(&self) -> RequestOutcome {
        match self {
            Self::InvalidQuery(_)
            | Self::Candlesticks(CandlestickError::Upstream(MarketDataError::Rejected { .. })) => {
                RequestOutcome::Rejected
            }
            Self::Candlesticks(_) => RequestOutcome::UpstreamError,
        }
    }

    /// Client-facing message. Provider text is never echoed back.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::InvalidQuery(reason) => format!("Invalid query parameters: {reason}"),
            Self::Candlesticks(CandlestickError::Upstream(error)) => match error {
                MarketDataError::Rejected { .. } => {
                    "Market data provider rejected the timeframe or duration".to_string()
                }
                MarketDataError::RateLimited { .. } => {
                    "Market data provider rate limit exceeded".to_string()
                }
                MarketDataError::UpstreamUnavailable { .. } => {
                    "Market data provider is unavailable".to_string()
                }
                MarketDataError::InvalidResponse { .. } => {
                    "Market data provider returned an invalid response".to_string()
                }
            },
            Self::Candlesticks(CandlestickError::Schema(BarError::SchemaMismatch { column })) => {
                format!("Market data provider response is missing column '{column}'")
            }
        }
    }
}

impl From<CandlestickError> for ApiError {
    fn from(error: CandlestickError) -> Self {
        Self::Candlesticks(error)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(ErrorEnvelope::new(self.message()))).into_response()
    }
}
