// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides an in-memory database, fast auth manager, seeded catalogue and user helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::too_many_lines,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `foodgram_server`
//!
//! Every test gets its own in-memory database and temporary media
//! directory, so tests can run in parallel.

use std::path::PathBuf;
use std::sync::{Arc, Once};

use anyhow::Result;
use axum::Router;
use foodgram_server::{
    auth::AuthManager,
    config::{
        AppBehaviorConfig, AuthConfig, DatabaseConfig, DatabaseUrl, Environment, HttpConfig,
        LogLevel, MediaConfig, ServerConfig,
    },
    database::Database,
    models::{Ingredient, NewUser, Tag, User},
    resources::ServerResources,
    server::build_router,
    services::media::LocalMediaStore,
};
use serde_json::{json, Value};
use tempfile::TempDir;

static INIT_LOGGER: Once = Once::new();

/// Public origin used in test configuration
pub const TEST_BASE_URL: &str = "http://testserver";

/// Password given to every user created by [`create_test_user`]
pub const TEST_PASSWORD: &str = "s3cret-pass";

/// Lowest work factor bcrypt accepts, keeps password hashing fast in tests
pub const TEST_BCRYPT_COST: u32 = 4;

/// 1x1 transparent PNG as a data URI
pub const PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new(&DatabaseUrl::Memory, 1).await?)
}

/// Create test authentication manager with the cheapest bcrypt cost
pub fn create_test_auth_manager() -> AuthManager {
    let jwt_secret = foodgram_server::auth::generate_jwt_secret();
    AuthManager::new(&jwt_secret, 24).with_bcrypt_cost(TEST_BCRYPT_COST)
}

/// Configuration pointing at an in-memory database and the given media root
pub fn create_test_config(media_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_owned(),
        http_port: 0,
        log_level: LogLevel::Warn,
        environment: Environment::Testing,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
            max_connections: 1,
        },
        auth: AuthConfig {
            jwt_secret: b"test-secret-test-secret-test-secret".to_vec(),
            jwt_expiry_hours: 24,
        },
        media: MediaConfig {
            root: media_root,
            public_base_url: TEST_BASE_URL.to_owned(),
        },
        http: HttpConfig {
            cors_allowed_origins: "*".to_owned(),
            request_timeout_secs: 30,
            max_body_bytes: 10 * 1024 * 1024,
        },
        app_behavior: AppBehaviorConfig {
            page_size: 6,
            max_ingredient_amount: 32_000,
        },
    }
}

/// Complete application wired against an in-memory database
pub struct TestApp {
    /// Shared handler resources
    pub resources: Arc<ServerResources>,
    /// Seeded tags: breakfast, lunch, dinner
    pub tags: Vec<Tag>,
    /// Seeded ingredients: salt (g), sugar (g), milk (ml)
    pub ingredients: Vec<Ingredient>,
    media_dir: TempDir,
}

impl TestApp {
    /// Build resources, seed the catalogue and keep the media directory alive
    pub async fn new() -> Result<Self> {
        let database = create_test_database().await?;
        let media_dir = TempDir::new()?;
        let config = Arc::new(create_test_config(media_dir.path().to_path_buf()));
        let media = Arc::new(LocalMediaStore::new(media_dir.path(), TEST_BASE_URL));
        let resources = Arc::new(ServerResources::with_media_store(
            database,
            create_test_auth_manager(),
            config,
            media,
        ));

        let mut tags = Vec::new();
        for (name, slug) in [
            ("Breakfast", "breakfast"),
            ("Lunch", "lunch"),
            ("Dinner", "dinner"),
        ] {
            tags.push(resources.database.tags().create_tag(name, slug).await?);
        }

        let mut ingredients = Vec::new();
        for (name, unit) in [("salt", "g"), ("sugar", "g"), ("milk", "ml")] {
            ingredients.push(
                resources
                    .database
                    .ingredients()
                    .create_ingredient(name, unit)
                    .await?,
            );
        }

        Ok(Self {
            resources,
            tags,
            ingredients,
            media_dir,
        })
    }

    /// Full router with all layers
    pub fn router(&self) -> Router {
        build_router(&self.resources)
    }

    /// Media directory backing this app
    pub fn media_root(&self) -> &std::path::Path {
        self.media_dir.path()
    }

    /// Seeded ingredient id by name
    pub fn ingredient_id(&self, name: &str) -> i64 {
        self.ingredients
            .iter()
            .find(|i| i.name == name)
            .map(|i| i.id)
            .expect("seeded ingredient")
    }

    /// Seeded tag id by slug
    pub fn tag_id(&self, slug: &str) -> i64 {
        self.tags
            .iter()
            .find(|t| t.slug == slug)
            .map(|t| t.id)
            .expect("seeded tag")
    }

    /// Create a user directly in storage and return it with a token
    pub async fn create_user(&self, username: &str) -> Result<(User, String)> {
        let password_hash = self.resources.auth_manager.hash_password(TEST_PASSWORD)?;
        let user = self
            .resources
            .database
            .users()
            .create_user(&NewUser {
                email: format!("{username}@example.com"),
                username: username.to_owned(),
                first_name: "Test".to_owned(),
                last_name: "User".to_owned(),
                password_hash,
            })
            .await?;
        let token = self.resources.auth_manager.generate_token(&user)?;
        Ok((user, token))
    }
}

/// Recipe creation body with the given ingredient lines and tags
pub fn recipe_body(name: &str, ingredients: &[(i64, i64)], tags: &[i64]) -> Value {
    let ingredients: Vec<Value> = ingredients
        .iter()
        .map(|(id, amount)| json!({"id": id, "amount": amount}))
        .collect();
    json!({
        "name": name,
        "text": "Mix everything and serve.",
        "cooking_time": 10,
        "image": PNG_DATA_URI,
        "ingredients": ingredients,
        "tags": tags,
    })
}
