// ABOUTME: Request authentication from the Authorization header using JWT bearer tokens
// ABOUTME: Resolves the token subject to a live user row for required and optional auth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::sync::Arc;

use axum::http::HeaderMap;
use tracing::{debug, warn};

use crate::auth::AuthManager;
use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::models::User;

/// Accepted authorization schemes
const TOKEN_PREFIXES: [&str; 2] = ["Bearer ", "Token "];

/// Authenticates HTTP requests for the REST handlers
#[derive(Clone)]
pub struct AuthMiddleware {
    auth_manager: Arc<AuthManager>,
    database: Arc<Database>,
}

impl AuthMiddleware {
    /// Create new auth middleware
    #[must_use]
    pub const fn new(auth_manager: Arc<AuthManager>, database: Arc<Database>) -> Self {
        Self {
            auth_manager,
            database,
        }
    }

    /// Authenticate a request that must carry a token
    ///
    /// # Errors
    ///
    /// Returns `AUTH_REQUIRED` when no header is present, `AUTH_INVALID` or
    /// `AUTH_EXPIRED` when the token is rejected or its user no longer exists
    pub async fn require_user(&self, headers: &HeaderMap) -> AppResult<User> {
        self.optional_user(headers)
            .await?
            .ok_or_else(AppError::auth_required)
    }

    /// Authenticate a request on an endpoint open to anonymous callers
    ///
    /// A missing header yields `None`; a present but bad token is still an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `AUTH_INVALID` or `AUTH_EXPIRED` when the token is rejected
    #[tracing::instrument(
        skip(self, headers),
        fields(user_id = tracing::field::Empty, success = tracing::field::Empty)
    )]
    pub async fn optional_user(&self, headers: &HeaderMap) -> AppResult<Option<User>> {
        let Some(header) = headers.get("authorization") else {
            return Ok(None);
        };
        let header = header
            .to_str()
            .map_err(|_| AppError::auth_invalid("Authorization header is not valid UTF-8"))?;

        let Some(token) = extract_token(header) else {
            tracing::Span::current().record("success", false);
            warn!("Invalid authorization header format");
            return Err(AppError::auth_invalid(
                "Invalid authorization header format - expected 'Bearer <token>' or 'Token <token>'",
            ));
        };

        match self.authenticate_token(token).await {
            Ok(user) => {
                tracing::Span::current()
                    .record("user_id", user.id)
                    .record("success", true);
                debug!(user_id = user.id, "Request authenticated");
                Ok(Some(user))
            }
            Err(e) => {
                tracing::Span::current().record("success", false);
                warn!("Token authentication failed: {}", e.message);
                Err(e)
            }
        }
    }

    async fn authenticate_token(&self, token: &str) -> AppResult<User> {
        let claims = self.auth_manager.validate_token(token)?;
        let user_id = claims.user_id()?;

        self.database
            .users()
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::auth_invalid("Token user no longer exists"))
    }
}

/// Strip a supported scheme from an `Authorization` header value
#[must_use]
pub fn extract_token(header: &str) -> Option<&str> {
    TOKEN_PREFIXES
        .iter()
        .find_map(|prefix| header.strip_prefix(prefix))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token() {
        assert_eq!(extract_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("Token abc"), Some("abc"));
        assert_eq!(extract_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(extract_token("Bearer   "), None);
    }
}
