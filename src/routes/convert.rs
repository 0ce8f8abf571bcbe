//! Conversion route
//!
//! `POST /convert` with `{ "data": <string|value>, "format": <tag> }`.
//! Responds with the encoded file as an attachment.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    middleware,
    response::Response,
    routing::post,
    Router,
};

use crate::convert::ConvertRequest;
use crate::error::{AppError, Result};
use crate::rate_limit::{self, RateLimiter};
use crate::state::AppState;

/// Create the convert router, guarded by the rate limiter when one is given
pub fn router(limiter: Option<RateLimiter>) -> Router<AppState> {
    let router = Router::new().route("/convert", post(convert));

    match limiter {
        Some(limiter) => {
            router.route_layer(middleware::from_fn_with_state(limiter, rate_limit::enforce))
        }
        None => router,
    }
}

/// Convert a JSON payload to the requested format
async fn convert(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let request: ConvertRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::MalformedBody(e.to_string()))?;

    let (input, format) = request.validate()?;
    let result = state.converter().convert(input, format).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, result.content_type)
        .header(header::CONTENT_LENGTH, result.bytes.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", result.filename),
        )
        .body(Body::from(result.bytes.clone()))
        .map_err(|e| AppError::Internal(e.to_string()))
}
