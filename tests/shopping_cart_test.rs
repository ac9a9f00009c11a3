// ABOUTME: HTTP tests for favorites, the shopping cart and the shopping list download
// ABOUTME: Verifies toggle status codes and per-ingredient aggregation across recipes
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
use common::{recipe_body, TestApp};
use helpers::axum_test::AxumTestRequest;
use serde_json::Value;

async fn publish(app: &TestApp, token: &str, name: &str, lines: &[(i64, i64)]) -> i64 {
    let recipe: Value = AxumTestRequest::post("/api/recipes")
        .bearer(token)
        .json(&recipe_body(name, lines, &[app.tag_id("dinner")]))
        .send(app.router())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    recipe["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_favorite_round_trip() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.create_user("chef").await?;
    let id = publish(&app, &token, "Risotto", &[(app.ingredient_id("salt"), 4)]).await;
    let uri = format!("/api/recipes/{id}/favorite");

    let short: Value = AxumTestRequest::post(&uri)
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(short["id"], id);
    assert_eq!(short["name"], "Risotto");
    assert_eq!(short["cooking_time"], 10);
    assert!(short["image"].as_str().unwrap().starts_with("http://testserver/media/"));
    assert!(short.get("ingredients").is_none());

    AxumTestRequest::post(&uri)
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::CONFLICT);

    AxumTestRequest::delete(&uri)
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    AxumTestRequest::delete(&uri)
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_toggles_check_auth_then_existence() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.create_user("chef").await?;

    AxumTestRequest::post("/api/recipes/777/shopping_cart")
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    AxumTestRequest::post("/api/recipes/777/shopping_cart")
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    AxumTestRequest::delete("/api/recipes/777/favorite")
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_shopping_list_sums_same_ingredient() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.create_user("chef").await?;
    let salt = app.ingredient_id("salt");
    let milk = app.ingredient_id("milk");

    let soup = publish(&app, &token, "Soup", &[(salt, 5), (milk, 100)]).await;
    let bread = publish(&app, &token, "Bread", &[(salt, 10)]).await;
    publish(&app, &token, "Not in cart", &[(salt, 500)]).await;

    for id in [soup, bread] {
        AxumTestRequest::post(&format!("/api/recipes/{id}/shopping_cart"))
            .bearer(&token)
            .send(app.router())
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart")
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);

    assert!(response
        .header("content-type")
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(
        response.header("content-disposition").as_deref(),
        Some("attachment; filename=\"shopping_list.txt\"")
    );
    assert_eq!(response.text(), "milk - 100 (ml)\nsalt - 15 (g)");
    Ok(())
}

#[tokio::test]
async fn test_shopping_list_separates_units_of_one_name() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.create_user("chef").await?;
    let salt_g = app.ingredient_id("salt");
    let salt_kg = app
        .resources
        .database
        .ingredients()
        .create_ingredient("salt", "kg")
        .await?
        .id;

    let brine = publish(&app, &token, "Brine", &[(salt_g, 5), (salt_kg, 2)]).await;
    let crust = publish(&app, &token, "Crust", &[(salt_g, 10)]).await;
    for id in [brine, crust] {
        AxumTestRequest::post(&format!("/api/recipes/{id}/shopping_cart"))
            .bearer(&token)
            .send(app.router())
            .await
            .assert_status(StatusCode::CREATED);
    }

    let text = AxumTestRequest::get("/api/recipes/download_shopping_cart")
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .text();
    assert_eq!(text, "salt - 15 (g)\nsalt - 2 (kg)");
    Ok(())
}

#[tokio::test]
async fn test_empty_cart_downloads_empty_file() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.create_user("chef").await?;

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart")
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.text(), "");

    AxumTestRequest::get("/api/recipes/download_shopping_cart")
        .send(app.router())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_cart_filter_and_flag() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.create_user("chef").await?;
    let salt = app.ingredient_id("salt");
    let carted = publish(&app, &token, "Carted", &[(salt, 1)]).await;
    publish(&app, &token, "Other", &[(salt, 1)]).await;

    AxumTestRequest::post(&format!("/api/recipes/{carted}/shopping_cart"))
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::CREATED);

    let page: Value = AxumTestRequest::get("/api/recipes?is_in_shopping_cart=1")
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["id"], carted);
    assert_eq!(page["results"][0]["is_in_shopping_cart"], true);
    assert_eq!(page["results"][0]["is_favorited"], false);
    Ok(())
}

#[tokio::test]
async fn test_deleting_recipe_removes_it_from_cart() -> Result<()> {
    let app = TestApp::new().await?;
    let (_, token) = app.create_user("chef").await?;
    let id = publish(&app, &token, "Temporary", &[(app.ingredient_id("sugar"), 20)]).await;

    AxumTestRequest::post(&format!("/api/recipes/{id}/shopping_cart"))
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::CREATED);
    AxumTestRequest::delete(&format!("/api/recipes/{id}"))
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let response = AxumTestRequest::get("/api/recipes/download_shopping_cart")
        .bearer(&token)
        .send(app.router())
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(response.text(), "");
    Ok(())
}
