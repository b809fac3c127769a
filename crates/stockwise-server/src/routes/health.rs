//! Health check reporting database reachability.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;
use serde_json::{Value, json};

use crate::state::AppState;

/// Liveness plus a database check. Answers 503 while the store is
/// unreachable.
pub(super) async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let connected = state.db.ping().await;
    let status = if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = json!({
        "status": if connected { "ok" } else { "degraded" },
        "database": if connected { "connected" } else { "disconnected" },
        "timestamp": Utc::now(),
    });
    (status, Json(body))
}
