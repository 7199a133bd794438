// Liveness and metrics endpoints

use axum::{extract::State, http::header, response::IntoResponse};

use crate::web::AppState;

pub async fn healthz() -> &'static str {
    "ok"
}

/// Prometheus text exposition of drain counters
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let active = state.scheduler.len().await;
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(active),
    )
}
