//! JSON Convert Server Library
//!
//! Converts JSON payloads to CSV, XML, YAML, PDF, XLSX and PNG downloads.
//! The server binary is in main.rs; the router is built here so tests can
//! drive it directly.
//!
//! # Modules
//!
//! - `formats`: One encoder per output format, selected by `FormatTag`
//! - `convert`: Request validation, the response cache and the dispatcher
//! - `rate_limit`: Per-client request quota middleware
//! - `routes`: HTTP handlers

pub mod config;
pub mod convert;
pub mod error;
pub mod formats;
pub mod rate_limit;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(routes::convert::router(state.rate_limiter().cloned()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
