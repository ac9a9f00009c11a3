// ABOUTME: Route handlers for recipe CRUD, favorites, shopping cart and list download
// ABOUTME: Reads are open to anonymous callers; writes need a token and authorship
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Recipe routes
//!
//! Create and update share one pipeline: field validation, existence checks
//! for referenced tags and ingredients, image storage, then a transactional
//! write. Favorites and the shopping cart share one pair of toggle handlers.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::json::JsonBody;
use super::query::QueryPairs;
use super::users::UserResponse;
use crate::constants::routes::SHORT_LINK_PREFIX;
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::models::{
    IngredientAmount, Recipe, RecipeChanges, RecipeDetail, RecipeFilter, RecipeRelation, Tag, User,
};
use crate::pagination::Page;
use crate::resources::ServerResources;
use crate::services::media::RECIPE_IMAGES;
use crate::services::short_link;
use crate::services::shopping_list;
use crate::services::validation::{validate_recipe, RecipePayload, ValidatedRecipe, WriteMode};

// ============================================================================
// Response Types
// ============================================================================

/// Full recipe representation
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Recipe id
    pub id: i64,
    /// Tags ordered by name
    pub tags: Vec<Tag>,
    /// Author as seen by the caller
    pub author: UserResponse,
    /// Ingredients with amounts
    pub ingredients: Vec<IngredientAmount>,
    /// Whether the caller favorited the recipe
    pub is_favorited: bool,
    /// Whether the recipe is in the caller's cart
    pub is_in_shopping_cart: bool,
    /// Dish name
    pub name: String,
    /// Absolute image URL
    pub image: String,
    /// Instructions
    pub text: String,
    /// Minutes
    pub cooking_time: i64,
}

impl RecipeResponse {
    fn from_detail(detail: RecipeDetail, resources: &ServerResources) -> Self {
        let RecipeDetail {
            recipe,
            author,
            tags,
            ingredients,
            is_favorited,
            is_in_shopping_cart,
        } = detail;
        Self {
            id: recipe.id,
            tags,
            author: UserResponse::from_profile(author, resources),
            ingredients,
            is_favorited,
            is_in_shopping_cart,
            image: resources.media_url(&recipe.image),
            name: recipe.name,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Compact recipe form used by toggles and subscription previews
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeShortResponse {
    /// Recipe id
    pub id: i64,
    /// Dish name
    pub name: String,
    /// Absolute image URL
    pub image: String,
    /// Minutes
    pub cooking_time: i64,
}

impl RecipeShortResponse {
    /// Build the compact form, resolving the image to a public URL
    #[must_use]
    pub fn from_recipe(recipe: Recipe, resources: &ServerResources) -> Self {
        Self {
            id: recipe.id,
            image: resources.media_url(&recipe.image),
            name: recipe.name,
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Short link response
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortLinkResponse {
    /// Absolute short URL
    #[serde(rename = "short-link")]
    pub short_link: String,
}

// ============================================================================
// Routes
// ============================================================================

/// Recipe routes implementation
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(Self::handle_list_recipes).post(Self::handle_create_recipe),
            )
            .route(
                "/api/recipes/download_shopping_cart",
                get(Self::handle_download_shopping_cart),
            )
            .route(
                "/api/recipes/:id",
                get(Self::handle_get_recipe)
                    .patch(Self::handle_update_recipe)
                    .delete(Self::handle_delete_recipe),
            )
            .route("/api/recipes/:id/get-link", get(Self::handle_get_link))
            .route(
                "/api/recipes/:id/favorite",
                post(Self::handle_add_favorite).delete(Self::handle_remove_favorite),
            )
            .route(
                "/api/recipes/:id/shopping_cart",
                post(Self::handle_add_to_cart).delete(Self::handle_remove_from_cart),
            )
            .with_state(resources)
    }

    // ========================================================================
    // Collection
    // ========================================================================

    /// Handle GET /api/recipes - Filtered, paginated recipe list
    async fn handle_list_recipes(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        RawQuery(raw): RawQuery,
    ) -> Result<Response, AppError> {
        let viewer = resources.auth_middleware.optional_user(&headers).await?;
        let query = QueryPairs::parse(raw.as_deref());
        let request = query
            .page_params()?
            .resolve(resources.config.app_behavior.page_size);

        let filter = RecipeFilter {
            tags: query.all("tags").into_iter().map(ToOwned::to_owned).collect(),
            authors: query.ids("author")?,
            is_favorited: query.flag("is_favorited"),
            is_in_shopping_cart: query.flag("is_in_shopping_cart"),
        };

        let (details, count) = resources
            .database
            .recipes()
            .list_details(&filter, viewer.map(|u| u.id), request)
            .await?;

        let link_base = query.link_base(&resources.config.media.public_base_url, "/api/recipes");
        let page = Page::new(details, count, request, &link_base)
            .map(|detail| RecipeResponse::from_detail(detail, &resources));

        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/recipes - Publish a recipe
    async fn handle_create_recipe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<JsonBody<RecipePayload>, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;
        let JsonBody(body) = body?;
        let changes = Self::prepare_changes(&resources, &body, WriteMode::Create).await?;

        let recipes = resources.database.recipes();
        let recipe_id = match recipes.create_recipe(user.id, &changes).await {
            Ok(id) => id,
            Err(e) => {
                Self::discard_image(&resources, changes.image.as_deref()).await;
                return Err(e);
            }
        };

        let detail = Self::load_detail(&resources, recipe_id, Some(user.id)).await?;
        Ok((
            StatusCode::CREATED,
            Json(RecipeResponse::from_detail(detail, &resources)),
        )
            .into_response())
    }

    // ========================================================================
    // Single recipe
    // ========================================================================

    /// Handle GET /api/recipes/:id - Recipe detail
    async fn handle_get_recipe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let viewer = resources.auth_middleware.optional_user(&headers).await?;
        let detail = Self::load_detail(&resources, recipe_id, viewer.map(|u| u.id)).await?;

        Ok((
            StatusCode::OK,
            Json(RecipeResponse::from_detail(detail, &resources)),
        )
            .into_response())
    }

    /// Handle PATCH /api/recipes/:id - Edit a recipe the caller authored
    async fn handle_update_recipe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
        body: Result<JsonBody<RecipePayload>, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;
        let existing = Self::owned_recipe(&resources, recipe_id, &user).await?;
        let JsonBody(body) = body?;
        let changes = Self::prepare_changes(&resources, &body, WriteMode::Update).await?;

        if let Err(e) = resources
            .database
            .recipes()
            .update_recipe(recipe_id, &changes)
            .await
        {
            Self::discard_image(&resources, changes.image.as_deref()).await;
            return Err(e);
        }
        if changes.image.is_some() {
            Self::discard_image(&resources, Some(&existing.image)).await;
        }

        let detail = Self::load_detail(&resources, recipe_id, Some(user.id)).await?;
        Ok((
            StatusCode::OK,
            Json(RecipeResponse::from_detail(detail, &resources)),
        )
            .into_response())
    }

    /// Handle DELETE /api/recipes/:id - Remove a recipe the caller authored
    async fn handle_delete_recipe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;
        let existing = Self::owned_recipe(&resources, recipe_id, &user).await?;

        resources.database.recipes().delete_recipe(recipe_id).await?;
        Self::discard_image(&resources, Some(&existing.image)).await;

        info!(user_id = user.id, recipe_id, "Recipe deleted");
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    /// Handle GET /api/recipes/:id/get-link - Shareable short URL
    async fn handle_get_link(
        State(resources): State<Arc<ServerResources>>,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let recipe = Self::existing_recipe(&resources, recipe_id).await?;
        let code = recipe
            .short_link
            .unwrap_or_else(|| short_link::encode(recipe.id));
        let base_url = resources
            .config
            .media
            .public_base_url
            .trim_end_matches('/');

        Ok((
            StatusCode::OK,
            Json(ShortLinkResponse {
                short_link: format!("{base_url}{SHORT_LINK_PREFIX}/{code}"),
            }),
        )
            .into_response())
    }

    // ========================================================================
    // Favorites and shopping cart
    // ========================================================================

    /// Handle POST /api/recipes/:id/favorite
    async fn handle_add_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::add_relation(&resources, &headers, recipe_id, RecipeRelation::Favorite).await
    }

    /// Handle DELETE /api/recipes/:id/favorite
    async fn handle_remove_favorite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::remove_relation(&resources, &headers, recipe_id, RecipeRelation::Favorite).await
    }

    /// Handle POST /api/recipes/:id/shopping_cart
    async fn handle_add_to_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::add_relation(&resources, &headers, recipe_id, RecipeRelation::ShoppingCart).await
    }

    /// Handle DELETE /api/recipes/:id/shopping_cart
    async fn handle_remove_from_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(recipe_id): Path<i64>,
    ) -> Result<Response, AppError> {
        Self::remove_relation(&resources, &headers, recipe_id, RecipeRelation::ShoppingCart).await
    }

    /// Handle GET /api/recipes/download_shopping_cart - Aggregated list as text
    async fn handle_download_shopping_cart(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;
        let items = resources.database.shopping_list().aggregate(user.id).await?;

        info!(user_id = user.id, lines = items.len(), "Shopping list exported");
        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    shopping_list::content_disposition(),
                ),
            ],
            shopping_list::render(&items),
        )
            .into_response())
    }

    async fn add_relation(
        resources: &ServerResources,
        headers: &HeaderMap,
        recipe_id: i64,
        relation: RecipeRelation,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(headers).await?;
        let recipe = Self::existing_recipe(resources, recipe_id).await?;

        resources
            .database
            .relations()
            .add(relation, user.id, recipe.id)
            .await?;

        info!(user_id = user.id, recipe_id, "Recipe added to {relation}");
        Ok((
            StatusCode::CREATED,
            Json(RecipeShortResponse::from_recipe(recipe, resources)),
        )
            .into_response())
    }

    async fn remove_relation(
        resources: &ServerResources,
        headers: &HeaderMap,
        recipe_id: i64,
        relation: RecipeRelation,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(headers).await?;
        Self::existing_recipe(resources, recipe_id).await?;

        let removed = resources
            .database
            .relations()
            .remove(relation, user.id, recipe_id)
            .await?;
        if !removed {
            return Err(AppError::invalid_input(format!(
                "Recipe is not in {relation}"
            )));
        }

        info!(user_id = user.id, recipe_id, "Recipe removed from {relation}");
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Validate a payload, check referenced rows and store the new image
    async fn prepare_changes(
        resources: &ServerResources,
        body: &RecipePayload,
        mode: WriteMode,
    ) -> AppResult<RecipeChanges> {
        let ValidatedRecipe {
            name,
            text,
            cooking_time,
            image,
            ingredients,
            tags,
        } = validate_recipe(
            body,
            mode,
            resources.config.app_behavior.max_ingredient_amount,
        )?;

        let ingredient_ids: Vec<i64> = ingredients.iter().map(|line| line.id).collect();
        let missing_ingredients = resources
            .database
            .ingredients()
            .find_missing(&ingredient_ids)
            .await?;
        let missing_tags = resources.database.tags().find_missing(&tags).await?;

        let mut errors = ValidationErrors::new();
        if !missing_ingredients.is_empty() {
            errors.add(
                "ingredients",
                format!("Unknown ingredient ids: {}", join_ids(&missing_ingredients)),
            );
        }
        if !missing_tags.is_empty() {
            errors.add(
                "tags",
                format!("Unknown tag ids: {}", join_ids(&missing_tags)),
            );
        }
        errors.into_result()?;

        let image = match image {
            Some(image) => Some(resources.media.save(RECIPE_IMAGES, &image).await?),
            None => None,
        };

        Ok(RecipeChanges {
            name,
            text,
            cooking_time,
            image,
            ingredients,
            tags,
        })
    }

    async fn existing_recipe(resources: &ServerResources, recipe_id: i64) -> AppResult<Recipe> {
        resources
            .database
            .recipes()
            .get_recipe(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))
    }

    async fn owned_recipe(
        resources: &ServerResources,
        recipe_id: i64,
        user: &User,
    ) -> AppResult<Recipe> {
        let recipe = Self::existing_recipe(resources, recipe_id).await?;
        if recipe.author_id != user.id {
            warn!(
                user_id = user.id,
                recipe_id,
                author_id = recipe.author_id,
                "Rejected change to another author's recipe"
            );
            return Err(AppError::permission_denied(
                "Only the author can change this recipe",
            ));
        }
        Ok(recipe)
    }

    async fn load_detail(
        resources: &ServerResources,
        recipe_id: i64,
        viewer_id: Option<i64>,
    ) -> AppResult<RecipeDetail> {
        resources
            .database
            .recipes()
            .get_detail(recipe_id, viewer_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))
    }

    async fn discard_image(resources: &ServerResources, path: Option<&str>) {
        if let Some(path) = path {
            if let Err(e) = resources.media.delete(path).await {
                warn!(path, "Failed to remove recipe image: {}", e.message);
            }
        }
    }
}

fn join_ids(ids: &[i64]) -> String {
    let unique: HashSet<i64> = ids.iter().copied().collect();
    let mut sorted: Vec<i64> = unique.into_iter().collect();
    sorted.sort_unstable();
    sorted
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
