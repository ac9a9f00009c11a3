// ABOUTME: HTTP tests for tags, ingredient search, health and served media
// ABOUTME: Read-only endpoints open to anonymous callers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, missing_docs)]

mod common;
mod helpers;

use anyhow::Result;
use axum::http::StatusCode;
use common::{recipe_body, TestApp};
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;

#[tokio::test]
async fn test_list_and_get_tags() -> Result<()> {
    let app = TestApp::new().await?;

    let tags: Value = AxumTestRequest::get("/api/tags")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let tags = tags.as_array().unwrap();
    assert_eq!(tags.len(), 3);
    assert!(tags.iter().all(|t| t["slug"].is_string()));

    let lunch: Value = AxumTestRequest::get(&format!("/api/tags/{}", app.tag_id("lunch")))
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(lunch["name"], "Lunch");

    AxumTestRequest::get("/api/tags/999")
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_ingredient_prefix_search() -> Result<()> {
    let app = TestApp::new().await?;
    app.resources
        .database
        .ingredients()
        .create_ingredient("Sugar syrup", "ml")
        .await?;

    let all: Value = AxumTestRequest::get("/api/ingredients")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(all.as_array().unwrap().len(), 4);

    let found: Value = AxumTestRequest::get("/api/ingredients?name=SU")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    let mut names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Sugar syrup", "sugar"]);

    let none: Value = AxumTestRequest::get("/api/ingredients?name=ugar")
        .send(app.router())
        .await
        .json();
    assert!(none.as_array().unwrap().is_empty());

    let salt: Value =
        AxumTestRequest::get(&format!("/api/ingredients/{}", app.ingredient_id("salt")))
            .send(app.router())
            .await
            .assert_status(StatusCode::OK)
            .json();
    assert_eq!(salt["measurement_unit"], "g");
    Ok(())
}

#[tokio::test]
async fn test_health_reports_database() -> Result<()> {
    let app = TestApp::new().await?;

    let health: Value = AxumTestRequest::get("/health")
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn test_uploaded_image_is_served() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.create_user("chef").await?;

    let recipe: Value = AxumTestRequest::post("/api/recipes")
        .bearer(&token)
        .json(&recipe_body(
            "Photo",
            &[(app.ingredient_id("salt"), 1)],
            &[app.tag_id("lunch")],
        ))
        .send(app.router())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    let path = recipe["image"]
        .as_str()
        .unwrap()
        .trim_start_matches("http://testserver")
        .to_owned();

    let response = AxumTestRequest::get(&path)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.header("content-type").as_deref(), Some("image/png"));
    Ok(())
}

#[tokio::test]
async fn test_responses_carry_request_id() -> Result<()> {
    let app = TestApp::new().await?;

    let response = AxumTestRequest::get("/api/tags").send(app.router()).await;
    assert!(response.header("x-request-id").is_some());

    let response = AxumTestRequest::get("/api/tags")
        .header("x-request-id", "fixed-id")
        .send(app.router())
        .await;
    assert_eq!(response.header("x-request-id").as_deref(), Some("fixed-id"));
    Ok(())
}
