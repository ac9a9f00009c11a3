// ABOUTME: Shared resource container handed to every route handler
// ABOUTME: Holds the database, auth manager, auth middleware, media store and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Server Resources
//!
//! Expensive objects are created once at startup and shared through `Arc`.
//! Handlers receive `State<Arc<ServerResources>>`.

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::middleware::AuthMiddleware;
use crate::services::media::{LocalMediaStore, MediaStore};

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Connection pool and managers
    pub database: Arc<Database>,
    /// Token issuing and password hashing
    pub auth_manager: Arc<AuthManager>,
    /// Request authentication
    pub auth_middleware: Arc<AuthMiddleware>,
    /// Uploaded image storage
    pub media: Arc<dyn MediaStore>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources with a local media store rooted at `MEDIA_ROOT`
    #[must_use]
    pub fn new(database: Database, auth_manager: AuthManager, config: Arc<ServerConfig>) -> Self {
        let media = Arc::new(LocalMediaStore::from_config(&config.media));
        Self::with_media_store(database, auth_manager, config, media)
    }

    /// Assemble resources around a caller-provided media store
    #[must_use]
    pub fn with_media_store(
        database: Database,
        auth_manager: AuthManager,
        config: Arc<ServerConfig>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        let database = Arc::new(database);
        let auth_manager = Arc::new(auth_manager);
        let auth_middleware = Arc::new(AuthMiddleware::new(
            Arc::clone(&auth_manager),
            Arc::clone(&database),
        ));

        Self {
            database,
            auth_manager,
            auth_middleware,
            media,
            config,
        }
    }

    /// Public URL for a media-relative path
    #[must_use]
    pub fn media_url(&self, path: &str) -> String {
        self.media.url(path)
    }
}
