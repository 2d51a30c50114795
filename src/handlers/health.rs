use crate::{db, AppState};
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe with a database connectivity check.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database_up = db::ping(&state.db).await;
    Json(json!({
        "status": if database_up { "healthy" } else { "degraded" },
        "service": env!("CARGO_PKG_NAME"),
        "database": if database_up { "connected" } else { "disconnected" },
    }))
}
