use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Serialize)]
pub struct LikesResponse {
    pub likes: Vec<Uuid>,
}

/// POST /posts/:id/like - Like the post, or unlike it if already liked
pub async fn toggle(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<LikesResponse>, ApiError> {
    let likes = state.posts.toggle_like(user.id, &id).await?;
    Ok(Json(LikesResponse { likes }))
}
