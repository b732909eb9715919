//! HTTP response DTOs.

use serde::{Deserialize, Serialize};

/// Status value of a successful envelope.
pub const STATUS_SUCCESS: &str = "success";

/// Status value of an error envelope.
pub const STATUS_ERROR: &str = "error";

/// `{"status": "success", "data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    /// Always `success`.
    pub status: String,
    /// Payload.
    pub data: T,
}

impl<T> SuccessEnvelope<T> {
    /// Wrap a payload.
    pub fn new(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data,
        }
    }
}

/// `{"status": "error", "message": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always `error`.
    pub status: String,
    /// Human-readable message.
    pub message: String,
}

impl ErrorEnvelope {
    /// Create an error envelope.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}
