pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use manager::DatabaseManager;
pub use memory::MemoryStore;
pub use models::{Comment, CommentRemovalError, Post, User, UserSummary};
pub use repository::PgPostStore;

/// Errors surfaced by every store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// Absent document, or an identifier that could never name one
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected store failure: {0}")]
    Unexpected(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(message: impl Into<String>) -> Self {
        StoreError::NotFound(message.into())
    }
}

/// Document-style persistence for post aggregates and the users they reference.
///
/// Each mutation replaces the whole aggregate; there is no version check, so two
/// concurrent read-modify-write cycles on one post resolve as last-writer-wins.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Posts newest first, optionally restricted to one author.
    async fn list_posts(&self, author: Option<Uuid>) -> Result<Vec<Post>, StoreError>;

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError>;

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError>;

    /// Persist the full aggregate over the stored copy.
    async fn save_post(&self, post: &Post) -> Result<(), StoreError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), StoreError>;

    /// Users matching `ids`; unknown ids are silently skipped.
    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;

    async fn find_post_404(&self, id: Uuid) -> Result<Post, StoreError> {
        self.find_post(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Post not found"))
    }
}

/// Parse a path identifier. Malformed ids are reported as `NotFound` with
/// `message`, the same as a well-formed id naming nothing.
pub fn parse_object_id(raw: &str, message: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw.trim()).map_err(|_| StoreError::not_found(message))
}
