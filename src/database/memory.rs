use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Post, PostStore, StoreError, User};

/// In-process store for development runs and tests
#[derive(Default)]
pub struct MemoryStore {
    posts: RwLock<HashMap<Uuid, Post>>,
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user record. Accounts are managed elsewhere in production.
    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn remove_user(&self, id: Uuid) -> Option<User> {
        self.users.write().await.remove(&id)
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list_posts(&self, author: Option<Uuid>) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().await;
        let mut found: Vec<Post> = posts
            .values()
            .filter(|p| author.map_or(true, |a| p.is_authored_by(a)))
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(found)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(StoreError::Unexpected(format!("duplicate post id {}", post.id)));
        }
        posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn save_post(&self, post: &Post) -> Result<(), StoreError> {
        let mut posts = self.posts.write().await;
        match posts.get_mut(&post.id) {
            Some(stored) => {
                *stored = post.clone();
                Ok(())
            }
            None => Err(StoreError::not_found("Post not found")),
        }
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), StoreError> {
        self.posts
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("Post not found"))
    }

    async fn find_users(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
