use axum::Json;
use serde_json::{json, Value};

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "message": "Cheek Analysis API is running",
        "status": "healthy"
    }))
}

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "cheek-analysis-backend"
    }))
}
