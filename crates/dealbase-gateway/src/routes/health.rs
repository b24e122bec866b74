//! Health check endpoint.

use axum::{extract::State, routing::get, Json, Router};

use crate::json::HealthResponse;
use crate::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check handler. Probes the record service and reports its clock.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let report = state.client.health().await.ok();
    let server_connected = report.is_some();

    Json(HealthResponse {
        status: if server_connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        server_connected,
        server_time: report.map(|r| r.server_time),
    })
}
