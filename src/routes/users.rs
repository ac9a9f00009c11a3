// ABOUTME: Route handlers for registration, profiles, passwords, avatars and subscriptions
// ABOUTME: User representations carry the caller's subscription flag and absolute avatar URL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! User routes
//!
//! Registration and public profiles are open to anonymous callers. Everything
//! under `/api/users/me`, password changes and subscriptions require a token.

use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::json::JsonBody;
use super::query::QueryPairs;
use super::recipes::RecipeShortResponse;
use crate::auth::AuthManager;
use crate::errors::{AppError, AppResult, ValidationErrors};
use crate::models::{NewUser, User, UserProfile};
use crate::pagination::Page;
use crate::resources::ServerResources;
use crate::services::media::{DecodedImage, AVATARS};
use crate::services::validation::{
    validate_new_password, validate_profile_update, validate_registration, ProfileUpdatePayload,
    RegistrationPayload,
};

// ============================================================================
// Request and Response Types
// ============================================================================

/// Public user representation
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// Login email
    pub email: String,
    /// User id
    pub id: i64,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Whether the caller follows this user
    pub is_subscribed: bool,
    /// Absolute avatar URL
    pub avatar: Option<String>,
}

impl UserResponse {
    /// Build the representation, resolving the avatar to a public URL
    #[must_use]
    pub fn from_profile(profile: UserProfile, resources: &ServerResources) -> Self {
        let UserProfile {
            user,
            is_subscribed,
        } = profile;
        Self {
            avatar: user.avatar.as_deref().map(|path| resources.media_url(path)),
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// Response to a successful registration
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisteredUserResponse {
    /// Login email
    pub email: String,
    /// User id
    pub id: i64,
    /// Public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

impl From<User> for RegisteredUserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Followed author with a preview of their recipes
#[derive(Debug, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    /// Author representation
    #[serde(flatten)]
    pub user: UserResponse,
    /// Newest recipes, truncated by `recipes_limit`
    pub recipes: Vec<RecipeShortResponse>,
    /// Total number of the author's recipes
    pub recipes_count: i64,
}

/// Password change body
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    /// Password currently in use
    pub current_password: Option<String>,
    /// Replacement password
    pub new_password: Option<String>,
}

/// Avatar upload body
#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    /// Base64 image data URI
    pub avatar: Option<String>,
}

/// Avatar upload response
#[derive(Debug, Serialize, Deserialize)]
pub struct AvatarResponse {
    /// Absolute avatar URL
    pub avatar: String,
}

// ============================================================================
// Routes
// ============================================================================

/// User routes implementation
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/users",
                get(Self::handle_list_users).post(Self::handle_register),
            )
            .route(
                "/api/users/me",
                get(Self::handle_get_me).patch(Self::handle_update_me),
            )
            .route(
                "/api/users/me/avatar",
                put(Self::handle_set_avatar).delete(Self::handle_delete_avatar),
            )
            .route("/api/users/set_password", post(Self::handle_set_password))
            .route(
                "/api/users/subscriptions",
                get(Self::handle_list_subscriptions),
            )
            .route("/api/users/:id", get(Self::handle_get_user))
            .route(
                "/api/users/:id/subscribe",
                post(Self::handle_subscribe).delete(Self::handle_unsubscribe),
            )
            .with_state(resources)
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Handle GET /api/users - Paginated user list
    async fn handle_list_users(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        RawQuery(raw): RawQuery,
    ) -> Result<Response, AppError> {
        let viewer = resources.auth_middleware.optional_user(&headers).await?;
        let query = QueryPairs::parse(raw.as_deref());
        let request = query
            .page_params()?
            .resolve(resources.config.app_behavior.page_size);

        let (profiles, count) = resources
            .database
            .users()
            .list_profiles(viewer.map(|u| u.id), request)
            .await?;

        let link_base = query.link_base(&resources.config.media.public_base_url, "/api/users");
        let page = Page::new(profiles, count, request, &link_base)
            .map(|profile| UserResponse::from_profile(profile, &resources));

        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/users - Register a new account
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        JsonBody(body): JsonBody<RegistrationPayload>,
    ) -> Result<Response, AppError> {
        let registration = validate_registration(&body)?;

        let users = resources.database.users();
        let (email_taken, username_taken) = users
            .find_conflicts(
                Some(&registration.email),
                Some(&registration.username),
                None,
            )
            .await?;
        Self::reject_conflicts(email_taken, username_taken)?;

        let password_hash =
            Self::hash_password(&resources.auth_manager, registration.password).await?;
        let user = users
            .create_user(&NewUser {
                email: registration.email,
                username: registration.username,
                first_name: registration.first_name,
                last_name: registration.last_name,
                password_hash,
            })
            .await?;

        Ok((StatusCode::CREATED, Json(RegisteredUserResponse::from(user))).into_response())
    }

    /// Handle GET /api/users/:id - Public profile
    async fn handle_get_user(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(user_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let viewer = resources.auth_middleware.optional_user(&headers).await?;
        let profile = resources
            .database
            .users()
            .get_profile(user_id, viewer.map(|u| u.id))
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {user_id}")))?;

        Ok((
            StatusCode::OK,
            Json(UserResponse::from_profile(profile, &resources)),
        )
            .into_response())
    }

    /// Handle GET /api/users/me - Caller's own profile
    async fn handle_get_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;
        let profile = UserProfile {
            user,
            is_subscribed: false,
        };

        Ok((
            StatusCode::OK,
            Json(UserResponse::from_profile(profile, &resources)),
        )
            .into_response())
    }

    /// Handle PATCH /api/users/me - Edit the caller's profile
    async fn handle_update_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<JsonBody<ProfileUpdatePayload>, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;
        let JsonBody(body) = body?;
        let update = validate_profile_update(&body)?;

        let users = resources.database.users();
        let user = if update.is_empty() {
            user
        } else {
            let (email_taken, username_taken) = users
                .find_conflicts(
                    update.email.as_deref(),
                    update.username.as_deref(),
                    Some(user.id),
                )
                .await?;
            Self::reject_conflicts(email_taken, username_taken)?;
            let updated = users.update_profile(user.id, &update).await?;
            info!(user_id = updated.id, "Profile updated");
            updated
        };

        let profile = UserProfile {
            user,
            is_subscribed: false,
        };
        Ok((
            StatusCode::OK,
            Json(UserResponse::from_profile(profile, &resources)),
        )
            .into_response())
    }

    /// Handle POST /api/users/set_password - Change the caller's password
    async fn handle_set_password(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<JsonBody<SetPasswordRequest>, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;
        let JsonBody(body) = body?;

        let mut errors = ValidationErrors::new();
        if matches!(body.current_password.as_deref(), None | Some("")) {
            errors.add("current_password", "This field is required.");
        }
        match body.new_password.as_deref() {
            None | Some("") => errors.add("new_password", "This field is required."),
            Some(new_password) => {
                if let Err(password_errors) = validate_new_password(new_password) {
                    for message in password_errors.messages("new_password") {
                        errors.add("new_password", message.clone());
                    }
                }
            }
        }
        errors.into_result()?;

        let (Some(current_password), Some(new_password)) =
            (body.current_password, body.new_password)
        else {
            return Err(AppError::invalid_input("Both passwords are required"));
        };

        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || {
            AuthManager::verify_password(&current_password, &stored_hash)
        })
        .await
        .map_err(|e| AppError::internal(format!("Password check task failed: {e}")))?;
        if !matches {
            let mut errors = ValidationErrors::new();
            errors.add("current_password", "Wrong password.");
            return Err(errors.into());
        }

        let password_hash = Self::hash_password(&resources.auth_manager, new_password).await?;
        resources
            .database
            .users()
            .update_password(user.id, &password_hash)
            .await?;

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    // ========================================================================
    // Avatars
    // ========================================================================

    /// Handle PUT /api/users/me/avatar - Upload or replace the avatar
    async fn handle_set_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        body: Result<JsonBody<AvatarRequest>, AppError>,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;
        let JsonBody(body) = body?;

        let mut errors = ValidationErrors::new();
        let image = match body.avatar.as_deref() {
            None | Some("") => {
                errors.add("avatar", "This field is required.");
                None
            }
            Some(uri) => DecodedImage::from_data_uri(uri)
                .map_err(|reason| errors.add("avatar", reason))
                .ok(),
        };
        errors.into_result()?;
        let image = image.ok_or_else(|| AppError::invalid_input("Avatar is required"))?;

        let path = resources.media.save(AVATARS, &image).await?;
        let previous = resources
            .database
            .users()
            .set_avatar(user.id, Some(&path))
            .await?;
        Self::discard_media(&resources, previous.as_deref()).await;

        info!(user_id = user.id, "Avatar updated");
        Ok((
            StatusCode::OK,
            Json(AvatarResponse {
                avatar: resources.media_url(&path),
            }),
        )
            .into_response())
    }

    /// Handle DELETE /api/users/me/avatar - Remove the avatar
    async fn handle_delete_avatar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;
        let previous = resources
            .database
            .users()
            .set_avatar(user.id, None)
            .await?;
        Self::discard_media(&resources, previous.as_deref()).await;

        Ok(StatusCode::NO_CONTENT.into_response())
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Handle GET /api/users/subscriptions - Authors the caller follows
    async fn handle_list_subscriptions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        RawQuery(raw): RawQuery,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;
        let query = QueryPairs::parse(raw.as_deref());
        let request = query
            .page_params()?
            .resolve(resources.config.app_behavior.page_size);
        let recipes_limit = query.lenient_number("recipes_limit");

        let (authors, count) = resources
            .database
            .follows()
            .list_following(user.id, request)
            .await?;

        let mut results = Vec::with_capacity(authors.len());
        for author in authors {
            results.push(Self::subscription_view(&resources, author, recipes_limit).await?);
        }

        let link_base = query.link_base(
            &resources.config.media.public_base_url,
            "/api/users/subscriptions",
        );
        let page = Page::new(results, count, request, &link_base);
        Ok((StatusCode::OK, Json(page)).into_response())
    }

    /// Handle POST /api/users/:id/subscribe - Follow an author
    async fn handle_subscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(author_id): Path<i64>,
        RawQuery(raw): RawQuery,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;
        let recipes_limit = QueryPairs::parse(raw.as_deref()).lenient_number("recipes_limit");

        let author = resources
            .database
            .users()
            .get_user(author_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {author_id}")))?;

        resources.database.follows().follow(user.id, author.id).await?;

        let profile = UserProfile {
            user: author,
            is_subscribed: true,
        };
        let view = Self::subscription_view(&resources, profile, recipes_limit).await?;
        Ok((StatusCode::CREATED, Json(view)).into_response())
    }

    /// Handle DELETE /api/users/:id/subscribe - Stop following an author
    async fn handle_unsubscribe(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(author_id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user = resources.auth_middleware.require_user(&headers).await?;

        if resources.database.users().get_user(author_id).await?.is_none() {
            return Err(AppError::not_found(format!("User {author_id}")));
        }

        if !resources.database.follows().unfollow(user.id, author_id).await? {
            return Err(AppError::invalid_input(
                "You are not subscribed to this author",
            ));
        }

        info!(user_id = user.id, author_id, "Unsubscribed from author");
        Ok(StatusCode::NO_CONTENT.into_response())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn subscription_view(
        resources: &ServerResources,
        author: UserProfile,
        recipes_limit: Option<i64>,
    ) -> AppResult<SubscriptionResponse> {
        let recipes = resources.database.recipes();
        let author_id = author.user.id;
        let preview = recipes.list_by_author(author_id, recipes_limit).await?;
        let recipes_count = recipes.count_by_author(author_id).await?;

        Ok(SubscriptionResponse {
            user: UserResponse::from_profile(author, resources),
            recipes: preview
                .into_iter()
                .map(|recipe| RecipeShortResponse::from_recipe(recipe, resources))
                .collect(),
            recipes_count,
        })
    }

    fn reject_conflicts(email_taken: bool, username_taken: bool) -> AppResult<()> {
        let mut errors = ValidationErrors::new();
        if email_taken {
            errors.add("email", "A user with that email already exists.");
        }
        if username_taken {
            errors.add("username", "A user with that username already exists.");
        }
        errors.into_result()
    }

    async fn hash_password(auth_manager: &Arc<AuthManager>, password: String) -> AppResult<String> {
        let auth_manager = Arc::clone(auth_manager);
        tokio::task::spawn_blocking(move || auth_manager.hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
    }

    async fn discard_media(resources: &ServerResources, path: Option<&str>) {
        if let Some(path) = path {
            if let Err(e) = resources.media.delete(path).await {
                warn!(path, "Failed to remove replaced media file: {}", e.message);
            }
        }
    }
}
