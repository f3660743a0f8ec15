use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
struct HealthReport {
    status: &'static str,
    database: bool,
    version: &'static str,
}

/// Liveness plus a database round-trip
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let database = state.db.ping().await;
    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let report = HealthReport {
        status: if database { "ok" } else { "degraded" },
        database,
        version: env!("CARGO_PKG_VERSION"),
    };
    (status, Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
