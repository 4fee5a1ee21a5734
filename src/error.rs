//! Crate error type with HTTP status code mapping.
//!
//! [`FeedError`] is the central error type. Each variant maps to a numeric
//! error code and, when it reaches the feed server's HTTP surface, to a
//! status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::DecodeError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "payload is not a PointCloudImage envelope: missing field `PointCloudImage` at line 1 column 2",
///     "details": "schema"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Crate-wide error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category      | HTTP Status               |
/// |-----------|---------------|---------------------------|
/// | 1000–1999 | Decode        | 400 Bad Request           |
/// | 3000–3999 | Server/Config | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// A payload could not be decoded into an envelope.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A configuration value is present but invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FeedError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Decode(DecodeError::Syntax { .. }) => 1001,
            Self::Decode(DecodeError::Schema { .. }) => 1002,
            Self::Internal(_) => 3000,
            Self::Config(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::Config(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            Self::Decode(err) => Some(err.kind().to_string()),
            Self::Config(_) | Self::Internal(_) => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
