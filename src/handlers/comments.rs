use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::api::{ApiJson, CommentView};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::require_content;

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<CommentView>,
}

/// POST /posts/:id/comment - Add a comment at the top of the post's thread
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<CommentBody>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let content = require_content(body.content)?;
    let comments = state.posts.add_comment(user.id, &id, content).await?;
    Ok(Json(CommentsResponse { comments }))
}

/// DELETE /posts/:id/comment/:comment_id - Comment author or post author only
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let comments = state.posts.delete_comment(user.id, &id, &comment_id).await?;
    Ok(Json(CommentsResponse { comments }))
}
