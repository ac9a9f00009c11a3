// ABOUTME: HTTP tests for registration, profiles, passwords, avatars and subscriptions
// ABOUTME: Covers field-level validation errors and the subscription recipe preview
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::too_many_lines,
    missing_docs
)]

mod common;
mod helpers;

use anyhow::Result;
use axum::http::StatusCode;
use common::{recipe_body, TestApp, PNG_DATA_URI, TEST_PASSWORD};
use foodgram_server::auth::AuthManager;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

fn registration(email: &str, username: &str) -> Value {
    json!({
        "email": email,
        "username": username,
        "first_name": "Ada",
        "last_name": "Lovelace",
        "password": "correct-horse",
    })
}

// ============================================================================
// Registration and profiles
// ============================================================================

#[tokio::test]
async fn test_register_user() -> Result<()> {
    let app = TestApp::new().await?;

    let created: Value = AxumTestRequest::post("/api/users")
        .json(&registration("ada@example.com", "ada"))
        .send(app.router())
        .await
        .assert_status(StatusCode::CREATED)
        .json();

    assert_eq!(created["email"], "ada@example.com");
    assert_eq!(created["username"], "ada");
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());

    let stored = app
        .resources
        .database
        .users()
        .get_user_by_email("ada@example.com")
        .await?
        .expect("user stored");
    assert!(AuthManager::verify_password("correct-horse", &stored.password_hash));
    Ok(())
}

#[tokio::test]
async fn test_register_reports_missing_and_taken_fields() -> Result<()> {
    let app = TestApp::new().await?;
    app.create_user("taken").await?;

    let error: Value = AxumTestRequest::post("/api/users")
        .json(&json!({"email": "someone@example.com"}))
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    let details = &error["error"]["details"];
    for field in ["username", "first_name", "last_name", "password"] {
        assert!(details[field].is_array(), "missing error for {field}");
    }

    let error: Value = AxumTestRequest::post("/api/users")
        .json(&registration("taken@example.com", "taken"))
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert!(error["error"]["details"]["email"].is_array());
    assert!(error["error"]["details"]["username"].is_array());
    Ok(())
}

#[tokio::test]
async fn test_register_rejects_reserved_username() -> Result<()> {
    let app = TestApp::new().await?;

    let error: Value = AxumTestRequest::post("/api/users")
        .json(&registration("me@example.com", "me"))
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert!(error["error"]["details"]["username"].is_array());
    Ok(())
}

#[tokio::test]
async fn test_me_requires_token() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.create_user("chef").await?;

    AxumTestRequest::get("/api/users/me")
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let me: Value = AxumTestRequest::get("/api/users/me")
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(me["id"], user.id);
    assert_eq!(me["is_subscribed"], false);
    assert!(me["avatar"].is_null());
    Ok(())
}

#[tokio::test]
async fn test_token_prefix_is_accepted() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.create_user("chef").await?;

    AxumTestRequest::get("/api/users/me")
        .header("authorization", &format!("Token {token}"))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn test_update_me() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.create_user("chef").await?;
    app.create_user("other").await?;

    let me: Value = AxumTestRequest::patch("/api/users/me")
        .bearer(&token)
        .json(&json!({"first_name": "Gordon"}))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(me["first_name"], "Gordon");
    assert_eq!(me["username"], "chef");

    AxumTestRequest::patch("/api/users/me")
        .bearer(&token)
        .json(&json!({"username": "other"}))
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_list_and_get_users() -> Result<()> {
    let app = TestApp::new().await?;
    let (first, _) = app.create_user("first").await?;
    app.create_user("second").await?;

    let page: Value = AxumTestRequest::get("/api/users?limit=1")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 2);
    assert_eq!(page["results"].as_array().unwrap().len(), 1);
    assert_eq!(page["next"], "http://testserver/api/users?page=2&limit=1");

    let profile: Value = AxumTestRequest::get(&format!("/api/users/{}", first.id))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(profile["username"], "first");

    AxumTestRequest::get("/api/users/999")
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

// ============================================================================
// Passwords
// ============================================================================

#[tokio::test]
async fn test_set_password() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.create_user("chef").await?;

    let error: Value = AxumTestRequest::post("/api/users/set_password")
        .bearer(&token)
        .json(&json!({"current_password": "wrong-password", "new_password": "brand-new-pass"}))
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(error["error"]["details"]["current_password"][0], "Wrong password.");

    AxumTestRequest::post("/api/users/set_password")
        .bearer(&token)
        .json(&json!({"current_password": TEST_PASSWORD, "new_password": "short"}))
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    AxumTestRequest::post("/api/users/set_password")
        .bearer(&token)
        .json(&json!({"current_password": TEST_PASSWORD, "new_password": "brand-new-pass"}))
        .send(app.router())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let stored = app.resources.database.users().get_user(user.id).await?.unwrap();
    assert!(AuthManager::verify_password("brand-new-pass", &stored.password_hash));
    assert!(!AuthManager::verify_password(TEST_PASSWORD, &stored.password_hash));
    Ok(())
}

// ============================================================================
// Avatars
// ============================================================================

#[tokio::test]
async fn test_avatar_upload_and_delete() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.create_user("chef").await?;

    let uploaded: Value = AxumTestRequest::put("/api/users/me/avatar")
        .bearer(&token)
        .json(&json!({"avatar": PNG_DATA_URI}))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let url = uploaded["avatar"].as_str().unwrap();
    assert!(url.starts_with("http://testserver/media/users/"));
    let stored = app
        .media_root()
        .join(url.trim_start_matches("http://testserver/media/"));
    assert!(stored.exists());

    let me: Value = AxumTestRequest::get("/api/users/me")
        .bearer(&token)
        .send(app.router())
        .await
        .json();
    assert_eq!(me["avatar"], url);

    AxumTestRequest::delete("/api/users/me/avatar")
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(!stored.exists());

    AxumTestRequest::put("/api/users/me/avatar")
        .bearer(&token)
        .json(&json!({"avatar": "not an image"}))
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

// ============================================================================
// Subscriptions
// ============================================================================

#[tokio::test]
async fn test_subscribe_lists_recipes_with_limit() -> Result<()> {
    let app = TestApp::new().await?;
    let (author, author_token) = app.create_user("chef").await?;
    let (_, reader_token) = app.create_user("reader").await?;
    let salt = app.ingredient_id("salt");
    let lunch = app.tag_id("lunch");

    for name in ["One", "Two", "Three"] {
        AxumTestRequest::post("/api/recipes")
            .bearer(&author_token)
            .json(&recipe_body(name, &[(salt, 1)], &[lunch]))
            .send(app.router())
            .await
            .assert_status(StatusCode::CREATED);
    }

    let subscribed: Value =
        AxumTestRequest::post(&format!("/api/users/{}/subscribe?recipes_limit=2", author.id))
            .bearer(&reader_token)
            .send(app.router())
            .await
            .assert_status(StatusCode::CREATED)
            .json();
    assert_eq!(subscribed["id"], author.id);
    assert_eq!(subscribed["is_subscribed"], true);
    assert_eq!(subscribed["recipes_count"], 3);
    assert_eq!(subscribed["recipes"].as_array().unwrap().len(), 2);
    assert_eq!(subscribed["recipes"][0]["name"], "Three");

    AxumTestRequest::post(&format!("/api/users/{}/subscribe", author.id))
        .bearer(&reader_token)
        .send(app.router())
        .await
        .assert_status(StatusCode::CONFLICT);

    let page: Value = AxumTestRequest::get("/api/users/subscriptions?recipes_limit=1")
        .bearer(&reader_token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["username"], "chef");
    assert_eq!(page["results"][0]["recipes"].as_array().unwrap().len(), 1);
    assert_eq!(page["results"][0]["recipes_count"], 3);

    let profile: Value = AxumTestRequest::get(&format!("/api/users/{}", author.id))
        .bearer(&reader_token)
        .send(app.router())
        .await
        .json();
    assert_eq!(profile["is_subscribed"], true);

    AxumTestRequest::delete(&format!("/api/users/{}/subscribe", author.id))
        .bearer(&reader_token)
        .send(app.router())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    AxumTestRequest::delete(&format!("/api/users/{}/subscribe", author.id))
        .bearer(&reader_token)
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_cannot_subscribe_to_self_or_missing_user() -> Result<()> {
    let app = TestApp::new().await?;
    let (user, token) = app.create_user("chef").await?;

    AxumTestRequest::post(&format!("/api/users/{}/subscribe", user.id))
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    AxumTestRequest::post("/api/users/9999/subscribe")
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    AxumTestRequest::post(&format!("/api/users/{}/subscribe", user.id))
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}
