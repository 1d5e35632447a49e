//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::domain::SlotSummary;
use crate::interfaces::http::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub slots: SlotSummary,
}

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let slots = state.parking.lock().await.summary();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        slots,
    })
}
