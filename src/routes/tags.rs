// ABOUTME: Read-only route handlers for the tag catalogue
// ABOUTME: Unpaginated list ordered by name plus single-tag lookup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Tag routes implementation
pub struct TagRoutes;

impl TagRoutes {
    /// Create all tag routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/tags", get(Self::handle_list_tags))
            .route("/api/tags/:id", get(Self::handle_get_tag))
            .with_state(resources)
    }

    /// Handle GET /api/tags
    async fn handle_list_tags(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let tags = resources.database.tags().list_tags().await?;
        Ok((StatusCode::OK, Json(tags)).into_response())
    }

    /// Handle GET /api/tags/:id
    async fn handle_get_tag(
        State(resources): State<Arc<ServerResources>>,
        Path(tag_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let tag = resources
            .database
            .tags()
            .get_tag(tag_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Tag {tag_id}")))?;
        Ok((StatusCode::OK, Json(tag)).into_response())
    }
}
