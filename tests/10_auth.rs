mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use social_feed_api::auth::{Claims, TokenKeys};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = common::TestApp::new()?;
    let res = app.get("/health").await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn public_routes_need_no_token() -> Result<()> {
    let app = common::TestApp::new()?;

    let res = app.get("/posts").await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!([]));
    Ok(())
}

#[tokio::test]
async fn gated_routes_reject_missing_token() -> Result<()> {
    let app = common::TestApp::new()?;
    let (_, token) = app.user("ada").await?;
    let post_id = app.create_post(&token, "hello").await?;

    let gated = [
        (Method::POST, "/posts".to_string()),
        (Method::PUT, format!("/posts/{}", post_id)),
        (Method::DELETE, format!("/posts/{}", post_id)),
        (Method::POST, format!("/posts/{}/like", post_id)),
        (Method::POST, format!("/posts/{}/comment", post_id)),
        (Method::DELETE, format!("/posts/{}/comment/{}", post_id, common::unknown_id())),
    ];

    for (method, uri) in gated {
        let res = app
            .request(method.clone(), &uri, None, Some(json!({ "content": "x" })))
            .await?;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(res.body["error"], "No token, authorization denied");
    }
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() -> Result<()> {
    let app = common::TestApp::new()?;
    let (_, token) = app.user("ada").await?;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/posts")
        .header(header::AUTHORIZATION, format!("Basic {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"content":"hi"}"#))?;

    let res = app.send(request).await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn tampered_token_is_rejected() -> Result<()> {
    let app = common::TestApp::new()?;
    let (_, token) = app.user("ada").await?;

    // Swap the first character of the signature segment
    let split = token.rfind('.').map(|i| i + 1).unwrap_or(0);
    let (head, signature) = token.split_at(split);
    let replacement = if signature.starts_with('A') { "B" } else { "A" };
    let tampered = format!("{}{}{}", head, replacement, &signature[1..]);

    let res = app
        .request(Method::POST, "/posts", Some(&tampered), Some(json!({ "content": "hi" })))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Token is not valid");
    Ok(())
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() -> Result<()> {
    let app = common::TestApp::new()?;
    let (user, _) = app.user("ada").await?;
    let foreign = TokenKeys::new("some-other-secret", 1)?.issue(user.id)?;

    let res = app
        .request(Method::POST, "/posts", Some(&foreign), Some(json!({ "content": "hi" })))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn expired_token_is_rejected() -> Result<()> {
    let app = common::TestApp::new()?;
    let (user, _) = app.user("ada").await?;

    let now = Utc::now().timestamp();
    let expired = app.keys.generate_jwt(&Claims {
        id: user.id,
        iat: Some(now - 7200),
        exp: now - 3600,
    })?;

    let res = app
        .request(Method::POST, "/posts", Some(&expired), Some(json!({ "content": "hi" })))
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Token is not valid");
    Ok(())
}

#[tokio::test]
async fn token_with_only_id_and_expiry_is_accepted() -> Result<()> {
    let app = common::TestApp::new()?;
    let (user, _) = app.user("ada").await?;

    let exp = Utc::now().timestamp() + 3600;
    let token = encode(
        &Header::default(),
        &json!({ "id": user.id, "exp": exp }),
        &EncodingKey::from_secret(common::SECRET.as_bytes()),
    )?;

    let res = app
        .request(Method::POST, "/posts", Some(&token), Some(json!({ "content": "hi" })))
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["author"]["_id"], user.id.to_string());
    Ok(())
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let app = common::TestApp::new()?;
    let res = app.get("/").await?;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}
