use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use super::{Comment, DatabaseManager, Post, PostStore, StoreError, User};

const POST_COLUMNS: &str = "id, author, content, image, likes, comments, created_at, updated_at";

#[derive(Debug, FromRow)]
struct PostRow {
    id: Uuid,
    author: Uuid,
    content: String,
    image: String,
    likes: Vec<Uuid>,
    comments: Json<Vec<Comment>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post::restore(
            row.id,
            row.author,
            row.content,
            row.image,
            row.comments.0,
            row.likes,
            row.created_at,
            row.updated_at,
        )
    }
}

/// PostgreSQL-backed store keeping each post aggregate in a single row
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn list_posts(&self, author: Option<Uuid>) -> Result<Vec<Post>, StoreError> {
        let sql = format!(
            "SELECT {} FROM posts WHERE ($1::uuid IS NULL OR author = $1) ORDER BY created_at DESC, id DESC",
            POST_COLUMNS
        );

        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(author)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let sql = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Post::from))
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author, content, image, likes, comments, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(post.id)
        .bind(post.author())
        .bind(&post.content)
        .bind(&post.image)
        .bind(post.likes())
        .bind(Json(&post.comments))
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_post(&self, post: &Post) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET content = $2, image = $3, likes = $4, comments = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(&post.content)
        .bind(&post.image)
        .bind(post.likes())
        .bind(Json(&post.comments))
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Post not found"));
        }
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("Post not found"));
        }
        Ok(())
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, avatar FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
