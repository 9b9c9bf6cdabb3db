use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use stakehouse_core::MetricsSnapshot;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    sessions: usize,
    tokens: usize,
    offers: usize,
    metrics: MetricsSnapshot,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            sessions: state.sessions.len(),
            tokens: state.sessions.token_count(),
            offers: state.ledger.offer_count(),
            metrics: state.metrics.snapshot(),
        }),
    )
}
