use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use marketscope_rust_core::models::HealthStatus;

use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        network: state.gateway.network().as_str().to_string(),
        timestamp: Utc::now(),
        cache_size: state.gateway.cache_len(),
    })
}

pub async fn clear_cache(State(state): State<AppState>) -> Json<Value> {
    state.gateway.clear_cache();
    Json(json!({
        "status": "success",
        "message": "Cache cleared",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
