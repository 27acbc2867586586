use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A comment embedded in its post's aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A post together with its comments and likes, loaded and saved as one unit.
///
/// `author` is fixed at construction; `likes` never holds the same user twice.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    author: Uuid,
    pub content: String,
    pub image: String,
    pub comments: Vec<Comment>,
    likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommentRemovalError {
    #[error("Comment not found")]
    NotFound,
    #[error("Not authorized")]
    NotAuthorized,
}

impl Post {
    pub fn new(author: Uuid, content: String, image: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author,
            content,
            image: image.unwrap_or_default(),
            comments: Vec::new(),
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a post from persisted fields, dropping duplicate likes.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        author: Uuid,
        content: String,
        image: String,
        comments: Vec<Comment>,
        likes: Vec<Uuid>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let mut unique = Vec::with_capacity(likes.len());
        for id in likes {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        Self {
            id,
            author,
            content,
            image,
            comments,
            likes: unique,
            created_at,
            updated_at,
        }
    }

    pub fn author(&self) -> Uuid {
        self.author
    }

    pub fn likes(&self) -> &[Uuid] {
        &self.likes
    }

    pub fn is_authored_by(&self, user: Uuid) -> bool {
        self.author == user
    }

    /// Overwrite content; image only changes when supplied.
    pub fn apply_update(&mut self, content: String, image: Option<String>) {
        self.content = content;
        if let Some(image) = image {
            self.image = image;
        }
        self.touch();
    }

    /// Flip `user`'s membership in the like set. Returns true when the post is
    /// now liked by `user`.
    pub fn toggle_like(&mut self, user: Uuid) -> bool {
        let liked = if self.likes.contains(&user) {
            self.likes.retain(|id| *id != user);
            false
        } else {
            self.likes.push(user);
            true
        };
        self.touch();
        liked
    }

    /// Place a new comment at the front of the sequence.
    pub fn add_comment(&mut self, author: Uuid, content: String) -> &Comment {
        self.comments.insert(
            0,
            Comment {
                id: Uuid::new_v4(),
                author,
                content,
                created_at: Utc::now(),
            },
        );
        self.touch();
        &self.comments[0]
    }

    /// Remove a comment on behalf of `caller`, who must have written either the
    /// comment or the post.
    pub fn remove_comment(&mut self, comment_id: Uuid, caller: Uuid) -> Result<Comment, CommentRemovalError> {
        let index = self
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or(CommentRemovalError::NotFound)?;

        if self.comments[index].author != caller && self.author != caller {
            return Err(CommentRemovalError::NotAuthorized);
        }

        let removed = self.comments.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Every user referenced by the aggregate, author first.
    pub fn user_ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        std::iter::once(self.author).chain(self.comments.iter().map(|c| c.author))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
