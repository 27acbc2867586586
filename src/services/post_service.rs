use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::api::format::{comments_to_views, post_to_view, referenced_users, Authors};
use crate::api::{CommentView, PostView};
use crate::database::{parse_object_id, CommentRemovalError, Post, PostStore, StoreError};
use crate::error::ApiError;

const POST_NOT_FOUND: &str = "Post not found";
const USER_NOT_FOUND: &str = "User not found";
const COMMENT_NOT_FOUND: &str = "Comment not found";

#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Comment not found")]
    CommentNotFound,
    #[error("Not authorized")]
    NotAuthorized,
}

impl From<CommentRemovalError> for PostError {
    fn from(err: CommentRemovalError) -> Self {
        match err {
            CommentRemovalError::NotFound => PostError::CommentNotFound,
            CommentRemovalError::NotAuthorized => PostError::NotAuthorized,
        }
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::Store(e) => e.into(),
            PostError::CommentNotFound => ApiError::not_found(COMMENT_NOT_FOUND),
            PostError::NotAuthorized => ApiError::not_authorized(),
        }
    }
}

/// Post, like and comment operations over a [`PostStore`].
///
/// Every mutation is one load, one in-memory change and one save of the aggregate.
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// All posts, newest first
    pub async fn feed(&self) -> Result<Vec<PostView>, PostError> {
        let posts = self.store.list_posts(None).await?;
        self.expand_all(&posts).await
    }

    pub async fn by_author(&self, raw_user_id: &str) -> Result<Vec<PostView>, PostError> {
        let author = parse_object_id(raw_user_id, USER_NOT_FOUND)?;
        let posts = self.store.list_posts(Some(author)).await?;
        self.expand_all(&posts).await
    }

    pub async fn get(&self, raw_id: &str) -> Result<PostView, PostError> {
        let post = self.load(raw_id).await?;
        self.expand(&post).await
    }

    pub async fn create(
        &self,
        caller: Uuid,
        content: String,
        image: Option<String>,
    ) -> Result<PostView, PostError> {
        let post = Post::new(caller, content, image);
        self.store.insert_post(&post).await?;
        info!(post_id = %post.id, author = %caller, "Post created");

        // Read back so the response reflects what was persisted
        let stored = self.store.find_post_404(post.id).await?;
        self.expand(&stored).await
    }

    pub async fn update(
        &self,
        caller: Uuid,
        raw_id: &str,
        content: String,
        image: Option<String>,
    ) -> Result<PostView, PostError> {
        let mut post = self.load(raw_id).await?;
        if !post.is_authored_by(caller) {
            return Err(PostError::NotAuthorized);
        }

        post.apply_update(content, image);
        self.store.save_post(&post).await?;

        let stored = self.store.find_post_404(post.id).await?;
        self.expand(&stored).await
    }

    pub async fn delete(&self, caller: Uuid, raw_id: &str) -> Result<(), PostError> {
        let post = self.load(raw_id).await?;
        if !post.is_authored_by(caller) {
            return Err(PostError::NotAuthorized);
        }

        self.store.delete_post(post.id).await?;
        info!(post_id = %post.id, "Post removed");
        Ok(())
    }

    /// Like when `caller` has not liked the post yet, unlike otherwise.
    /// Returns the resulting like set.
    pub async fn toggle_like(&self, caller: Uuid, raw_id: &str) -> Result<Vec<Uuid>, PostError> {
        let mut post = self.load(raw_id).await?;
        let liked = post.toggle_like(caller);
        self.store.save_post(&post).await?;

        tracing::debug!(post_id = %post.id, user = %caller, liked, "Like toggled");
        Ok(post.likes().to_vec())
    }

    pub async fn add_comment(
        &self,
        caller: Uuid,
        raw_id: &str,
        content: String,
    ) -> Result<Vec<CommentView>, PostError> {
        let mut post = self.load(raw_id).await?;
        post.add_comment(caller, content);
        self.store.save_post(&post).await?;

        let stored = self.store.find_post_404(post.id).await?;
        self.expand_comments(&stored).await
    }

    pub async fn delete_comment(
        &self,
        caller: Uuid,
        raw_id: &str,
        raw_comment_id: &str,
    ) -> Result<Vec<CommentView>, PostError> {
        let mut post = self.load(raw_id).await?;
        let comment_id = Uuid::parse_str(raw_comment_id.trim()).map_err(|_| PostError::CommentNotFound)?;

        post.remove_comment(comment_id, caller)?;
        self.store.save_post(&post).await?;

        self.expand_comments(&post).await
    }

    async fn load(&self, raw_id: &str) -> Result<Post, StoreError> {
        let id = parse_object_id(raw_id, POST_NOT_FOUND)?;
        self.store.find_post_404(id).await
    }

    async fn authors_for<'a>(&self, posts: impl IntoIterator<Item = &'a Post>) -> Result<Authors, StoreError> {
        let ids = referenced_users(posts);
        let users = self.store.find_users(&ids).await?;
        Ok(Authors::from_users(&users))
    }

    async fn expand(&self, post: &Post) -> Result<PostView, PostError> {
        let authors = self.authors_for([post]).await?;
        Ok(post_to_view(post, &authors))
    }

    async fn expand_all(&self, posts: &[Post]) -> Result<Vec<PostView>, PostError> {
        let authors = self.authors_for(posts).await?;
        Ok(posts.iter().map(|p| post_to_view(p, &authors)).collect())
    }

    async fn expand_comments(&self, post: &Post) -> Result<Vec<CommentView>, PostError> {
        let authors = self.authors_for([post]).await?;
        Ok(comments_to_views(&post.comments, &authors))
    }
}
