// server/handlers/health.rs - GET /health handler

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::server::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let tenants = state.store.read().await.list(&Default::default()).len();

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "tenants": tenants,
    }))
}
