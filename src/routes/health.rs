//! Health check endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::convert::CacheStats;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
    pub cache: CacheStats,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "json-convert-server",
        cache: state.converter().cache().stats().await,
    })
}
