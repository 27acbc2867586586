#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use social_feed_api::auth::TokenKeys;
use social_feed_api::config::AppConfig;
use social_feed_api::database::{MemoryStore, User};
use social_feed_api::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

/// Router wired to an in-memory store, driven in-process
pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
    pub keys: TokenKeys,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Result<Self> {
        let config = AppConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some(SECRET.to_string()),
            "API_ENABLE_REQUEST_LOGGING" => Some("false".to_string()),
            _ => None,
        })?;

        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config, store.clone())?;
        let keys = state.keys.clone();

        Ok(Self {
            router: app(state),
            store,
            keys,
        })
    }

    /// Seed a user and return it with a valid token
    pub async fn user(&self, username: &str) -> Result<(User, String)> {
        let user = User::new(username, format!("{}.png", username));
        self.store.insert_user(user.clone()).await;
        let token = self.keys.issue(user.id)?;
        Ok((user, token))
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };
        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        self.request(Method::GET, uri, None, None).await
    }

    /// Create a post as the token's owner and return its id
    pub async fn create_post(&self, token: &str, content: &str) -> Result<String> {
        let res = self
            .request(
                Method::POST,
                "/posts",
                Some(token),
                Some(serde_json::json!({ "content": content })),
            )
            .await?;
        anyhow::ensure!(res.status == StatusCode::OK, "create failed: {:?}", res.body);
        res.body["_id"]
            .as_str()
            .map(str::to_string)
            .context("created post has no _id")
    }
}

pub fn ids(values: &Value) -> Vec<String> {
    values
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["_id"].as_str().or_else(|| item.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub fn unknown_id() -> String {
    Uuid::new_v4().to_string()
}
