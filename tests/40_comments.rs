mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

async fn comment(app: &common::TestApp, token: &str, post: &str, content: &str) -> Result<common::TestResponse> {
    app.request(
        Method::POST,
        &format!("/posts/{}/comment", post),
        Some(token),
        Some(json!({ "content": content })),
    )
    .await
}

#[tokio::test]
async fn comments_are_newest_first_with_expanded_authors() -> Result<()> {
    let app = common::TestApp::new()?;
    let (_, ada_token) = app.user("ada").await?;
    let (bob, bob_token) = app.user("bob").await?;
    let id = app.create_post(&ada_token, "discuss").await?;

    comment(&app, &ada_token, &id, "first").await?;
    let res = comment(&app, &bob_token, &id, "second").await?;

    assert_eq!(res.status, StatusCode::OK);
    let comments = &res.body["comments"];
    assert_eq!(comments[0]["content"], "second");
    assert_eq!(comments[0]["author"]["_id"], bob.id.to_string());
    assert_eq!(comments[0]["author"]["username"], "bob");
    assert_eq!(comments[1]["content"], "first");
    Ok(())
}

#[tokio::test]
async fn add_then_delete_restores_comments() -> Result<()> {
    let app = common::TestApp::new()?;
    let (_, ada_token) = app.user("ada").await?;
    let (_, bob_token) = app.user("bob").await?;
    let id = app.create_post(&ada_token, "thread").await?;
    comment(&app, &ada_token, &id, "existing").await?;

    let before = app.get(&format!("/posts/{}", id)).await?.body["comments"].clone();

    let added = comment(&app, &bob_token, &id, "fleeting").await?;
    let comment_id = added.body["comments"][0]["_id"].as_str().unwrap_or_default().to_string();

    let res = app
        .request(
            Method::DELETE,
            &format!("/posts/{}/comment/{}", id, comment_id),
            Some(&bob_token),
            None,
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["comments"], before);

    let after = app.get(&format!("/posts/{}", id)).await?.body["comments"].clone();
    assert_eq!(after, before);
    Ok(())
}

#[tokio::test]
async fn post_author_may_delete_any_comment() -> Result<()> {
    let app = common::TestApp::new()?;
    let (_, ada_token) = app.user("ada").await?;
    let (_, bob_token) = app.user("bob").await?;
    let id = app.create_post(&ada_token, "moderated").await?;

    let added = comment(&app, &bob_token, &id, "spam").await?;
    let comment_id = added.body["comments"][0]["_id"].as_str().unwrap_or_default().to_string();

    let res = app
        .request(
            Method::DELETE,
            &format!("/posts/{}/comment/{}", id, comment_id),
            Some(&ada_token),
            None,
        )
        .await?;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["comments"], json!([]));
    Ok(())
}

#[tokio::test]
async fn stranger_cannot_delete_comment() -> Result<()> {
    let app = common::TestApp::new()?;
    let (_, ada_token) = app.user("ada").await?;
    let (_, bob_token) = app.user("bob").await?;
    let (_, eve_token) = app.user("eve").await?;
    let id = app.create_post(&ada_token, "guarded").await?;

    let added = comment(&app, &bob_token, &id, "keep me").await?;
    let comment_id = added.body["comments"][0]["_id"].as_str().unwrap_or_default().to_string();

    let res = app
        .request(
            Method::DELETE,
            &format!("/posts/{}/comment/{}", id, comment_id),
            Some(&eve_token),
            None,
        )
        .await?;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["error"], "Not authorized");

    let stored = app.get(&format!("/posts/{}", id)).await?;
    assert_eq!(stored.body["comments"][0]["_id"], comment_id);
    Ok(())
}

#[tokio::test]
async fn missing_comment_or_post_is_404() -> Result<()> {
    let app = common::TestApp::new()?;
    let (_, token) = app.user("ada").await?;
    let id = app.create_post(&token, "empty thread").await?;

    let unknown_comment = app
        .request(
            Method::DELETE,
            &format!("/posts/{}/comment/{}", id, common::unknown_id()),
            Some(&token),
            None,
        )
        .await?;
    assert_eq!(unknown_comment.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown_comment.body["error"], "Comment not found");

    let unknown_post = app
        .request(
            Method::DELETE,
            &format!("/posts/{}/comment/{}", common::unknown_id(), common::unknown_id()),
            Some(&token),
            None,
        )
        .await?;
    assert_eq!(unknown_post.status, StatusCode::NOT_FOUND);
    assert_eq!(unknown_post.body["error"], "Post not found");

    let on_missing_post = comment(&app, &token, &common::unknown_id(), "hello?").await?;
    assert_eq!(on_missing_post.status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn blank_comment_is_rejected() -> Result<()> {
    let app = common::TestApp::new()?;
    let (_, token) = app.user("ada").await?;
    let id = app.create_post(&token, "quiet").await?;

    let res = comment(&app, &token, &id, "").await?;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    Ok(())
}
