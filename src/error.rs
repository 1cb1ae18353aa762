//! Error types for the admin layer
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Admin Error Enum ==
/// Unified error type for bulk and administrative operations.
///
/// Any `Err` returned by an enumerate, list or aggregate call means the
/// operation itself could not be performed. "Nothing matched" is always an
/// `Ok` with an empty collection.
#[derive(Error, Debug)]
pub enum AdminError {
    /// A server handle could not be obtained
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The cursor scan broke while being drained
    #[error("Scan failed: {0}")]
    Scan(String),

    /// A single store command failed
    #[error("Command failed for key {key}: {message}")]
    Command { key: String, message: String },

    /// A payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The caller's cancellation token fired
    #[error("Operation cancelled")]
    Cancelled,

    /// The operation exceeded its deadline
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Key not found in the store
    #[error("Key not found: {0}")]
    NotFound(String),
}

impl AdminError {
    /// Builds a [`AdminError::Command`] for `key`.
    pub fn command(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            key: key.into(),
            message: message.into(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = match &self {
            AdminError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            AdminError::Scan(_) | AdminError::Command { .. } => StatusCode::BAD_GATEWAY,
            AdminError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AdminError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
            AdminError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AdminError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the admin layer.
pub type Result<T> = std::result::Result<T, AdminError>;
