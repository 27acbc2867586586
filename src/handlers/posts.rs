use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{ApiJson, PostView};
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;

use super::require_content;

#[derive(Debug, Deserialize)]
pub struct PostBody {
    #[serde(default)]
    pub content: String,
    pub image: Option<String>,
}

/// GET /posts - Every post, newest first
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PostView>>, ApiError> {
    Ok(Json(state.posts.feed().await?))
}

/// GET /posts/user/:user_id - Posts written by one user, newest first
pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<PostView>>, ApiError> {
    Ok(Json(state.posts.by_author(&user_id).await?))
}

/// GET /posts/:id - A single post
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostView>, ApiError> {
    Ok(Json(state.posts.get(&id).await?))
}

/// POST /posts - Create a post authored by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(body): ApiJson<PostBody>,
) -> Result<Json<PostView>, ApiError> {
    let content = require_content(body.content)?;
    Ok(Json(state.posts.create(user.id, content, body.image).await?))
}

/// PUT /posts/:id - Replace content (and image when given); author only
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<PostBody>,
) -> Result<Json<PostView>, ApiError> {
    let content = require_content(body.content)?;
    Ok(Json(state.posts.update(user.id, &id, content, body.image).await?))
}

/// DELETE /posts/:id - Remove the post and its comments; author only
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state.posts.delete(user.id, &id).await?;
    Ok(Json(json!({ "msg": "Post removed" })))
}
