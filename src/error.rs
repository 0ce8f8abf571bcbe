//! Error types for the JSON Convert server

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::convert::ConvertError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The request body was not a JSON envelope at all
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Rate limit of {limit} requests per {window_minutes} minutes exceeded")]
    RateLimited {
        limit: u32,
        window_minutes: u64,
        retry_after: Duration,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::MalformedBody(_) => (
                StatusCode::BAD_REQUEST,
                "bad_request",
                "Check Json syntax and try again!".to_string(),
            ),
            AppError::Convert(ConvertError::InvalidInput(_)) => (
                StatusCode::BAD_REQUEST,
                "invalid_input",
                "Invalid JSON data".to_string(),
            ),
            AppError::Convert(ConvertError::UnsupportedFormat(_)) => (
                StatusCode::BAD_REQUEST,
                "unsupported_format",
                "Invalid format".to_string(),
            ),
            AppError::Convert(ConvertError::EncodingFailure { format, source }) => {
                tracing::error!(format = %format, "Encoding error: {}", source);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "encoding_failure",
                    format!("Error converting to {}", format.display_name()),
                )
            }
            AppError::RateLimited {
                limit,
                window_minutes,
                ..
            } => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                format!(
                    "You have reached the max quota of {} requests. Please wait for {} minutes!",
                    limit, window_minutes
                ),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        });

        let mut response = (status, body).into_response();
        if let AppError::RateLimited { retry_after, .. } = &self {
            let seconds = retry_after.as_secs().max(1);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(seconds));
        }
        response
    }
}
