use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;

/// GET / - Service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Social Feed API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "posts": "/posts, /posts/user/:userId, /posts/:id (public read)",
            "write": "POST /posts, PUT|DELETE /posts/:id (bearer token)",
            "likes": "POST /posts/:id/like (bearer token)",
            "comments": "POST /posts/:id/comment, DELETE /posts/:id/comment/:commentId (bearer token)",
            "health": "/health",
        }
    }))
}

/// GET /health - Store connectivity probe
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.health_check().await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        ApiError::service_unavailable("database unavailable")
    })?;

    Ok(Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "database": "ok"
    })))
}
