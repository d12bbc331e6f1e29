use axum::Json;
use serde_json::{json, Value};

/// GET /health - liveness only; does not touch the store.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
