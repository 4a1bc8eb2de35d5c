use axum::Json;
use serde_json::{json, Value};
use tracing::debug;

/// GET /health
pub async fn health_check() -> Json<Value> {
    debug!("Health check hit");
    Json(json!({ "status": "ok" }))
}
