use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::database::{Comment, Post, User, UserSummary};

/// Wire format of a post with author identities expanded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// `null` when the author's account no longer exists
    pub author: Option<UserSummary>,
    pub content: String,
    pub image: String,
    pub likes: Vec<Uuid>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub author: Option<UserSummary>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Lookup table of display identities keyed by user id
#[derive(Debug, Default)]
pub struct Authors(HashMap<Uuid, UserSummary>);

impl Authors {
    pub fn from_users(users: &[User]) -> Self {
        Self(users.iter().map(|u| (u.id, UserSummary::from(u))).collect())
    }

    pub fn get(&self, id: Uuid) -> Option<UserSummary> {
        self.0.get(&id).cloned()
    }
}

/// Distinct user ids referenced by `posts`, in first-seen order
pub fn referenced_users<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    posts
        .into_iter()
        .flat_map(|post| post.user_ids())
        .filter(|id| seen.insert(*id))
        .collect()
}

pub fn post_to_view(post: &Post, authors: &Authors) -> PostView {
    PostView {
        id: post.id,
        author: authors.get(post.author()),
        content: post.content.clone(),
        image: post.image.clone(),
        likes: post.likes().to_vec(),
        comments: comments_to_views(&post.comments, authors),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

pub fn comments_to_views(comments: &[Comment], authors: &Authors) -> Vec<CommentView> {
    comments
        .iter()
        .map(|c| CommentView {
            id: c.id,
            author: authors.get(c.author),
            content: c.content.clone(),
            created_at: c.created_at,
        })
        .collect()
}
