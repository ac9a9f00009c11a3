// ABOUTME: Short link redirect from /s/{code} to the frontend recipe page
// ABOUTME: Codes are validated as base62 before the database lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::debug;

use crate::constants::routes::RECIPE_PAGE_PREFIX;
use crate::errors::AppError;
use crate::resources::ServerResources;
use crate::services::short_link;

/// Short link routes implementation
pub struct ShortLinkRoutes;

impl ShortLinkRoutes {
    /// Create the short link redirect route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/s/:code", get(Self::handle_redirect))
            .with_state(resources)
    }

    /// Handle GET /s/:code - 302 to `/recipes/{id}/`
    async fn handle_redirect(
        State(resources): State<Arc<ServerResources>>,
        Path(code): Path<String>,
    ) -> Result<Response, AppError> {
        if short_link::decode(&code).is_none() {
            return Err(AppError::not_found(format!("Short link '{code}'")));
        }

        let recipe = resources
            .database
            .recipes()
            .get_recipe_by_short_link(&code)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Short link '{code}'")))?;

        debug!(code, recipe_id = recipe.id, "Resolved short link");
        let location = format!("{RECIPE_PAGE_PREFIX}/{}/", recipe.id);
        Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
    }
}
