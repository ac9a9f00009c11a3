// ABOUTME: Read-only route handlers for the ingredient catalogue
// ABOUTME: Supports a case-insensitive name prefix search for recipe forms
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Ingredient search parameters
#[derive(Debug, Default, Deserialize)]
pub struct IngredientSearch {
    /// Name prefix
    pub name: Option<String>,
}

/// Ingredient routes implementation
pub struct IngredientRoutes;

impl IngredientRoutes {
    /// Create all ingredient routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ingredients", get(Self::handle_list_ingredients))
            .route("/api/ingredients/:id", get(Self::handle_get_ingredient))
            .with_state(resources)
    }

    /// Handle GET /api/ingredients?name=<prefix>
    async fn handle_list_ingredients(
        State(resources): State<Arc<ServerResources>>,
        Query(search): Query<IngredientSearch>,
    ) -> Result<Response, AppError> {
        let ingredients = resources
            .database
            .ingredients()
            .list_ingredients(search.name.as_deref())
            .await?;
        Ok((StatusCode::OK, Json(ingredients)).into_response())
    }

    /// Handle GET /api/ingredients/:id
    async fn handle_get_ingredient(
        State(resources): State<Arc<ServerResources>>,
        Path(ingredient_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let ingredient = resources
            .database
            .ingredients()
            .get_ingredient(ingredient_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ingredient {ingredient_id}")))?;
        Ok((StatusCode::OK, Json(ingredient)).into_response())
    }
}
