// ABOUTME: SQLite connection pool setup and schema migrations for the recipe catalogue
// ABOUTME: Declares per-domain managers for users, catalogue, recipes, relations and follows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Database Management
//!
//! [`Database`] owns the `SqlitePool` and creates the schema at startup with
//! idempotent `CREATE TABLE IF NOT EXISTS` statements. Each domain gets a
//! small manager struct wrapping a clone of the pool, in the same shape:
//! hand-written SQL, rows mapped by column name, and database failures turned
//! into [`AppError`] values with context.

mod follows;
mod ingredients;
mod recipes;
mod relations;
mod shopping_list;
mod tags;
mod transactions;
mod users;

pub use follows::FollowManager;
pub use ingredients::IngredientManager;
pub use recipes::RecipeManager;
pub use relations::RelationManager;
pub use shopping_list::ShoppingListManager;
pub use tags::TagManager;
pub use transactions::TransactionGuard;
pub use users::UserManager;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::DatabaseUrl;
use crate::errors::{AppError, AppResult};

/// Database handle shared by all request handlers
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the pool and apply the schema
    ///
    /// In-memory databases are private to one connection, so the pool is
    /// pinned to a single connection that is never recycled.
    ///
    /// # Errors
    ///
    /// Returns an error if the database file cannot be created, the pool
    /// cannot connect, or a migration fails
    pub async fn new(url: &DatabaseUrl, max_connections: u32) -> AppResult<Self> {
        let pool = match url {
            DatabaseUrl::Memory => {
                let options = SqliteConnectOptions::from_str("sqlite::memory:")
                    .map_err(|e| AppError::config(format!("Invalid database URL: {e}")))?
                    .foreign_keys(true);
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await
            }
            DatabaseUrl::SQLite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| {
                        AppError::database(format!(
                            "Failed to create database directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .foreign_keys(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .busy_timeout(Duration::from_secs(5));
                SqlitePoolOptions::new()
                    .max_connections(max_connections)
                    .connect_with(options)
                    .await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to connect to {url}: {e}")))?;

        let database = Self { pool };
        database.migrate().await?;
        info!(database = %url, "Database ready");
        Ok(database)
    }

    /// Get the underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// User accounts
    #[must_use]
    pub fn users(&self) -> UserManager {
        UserManager::new(self.pool.clone())
    }

    /// Tag catalogue
    #[must_use]
    pub fn tags(&self) -> TagManager {
        TagManager::new(self.pool.clone())
    }

    /// Ingredient catalogue
    #[must_use]
    pub fn ingredients(&self) -> IngredientManager {
        IngredientManager::new(self.pool.clone())
    }

    /// Recipes and their associations
    #[must_use]
    pub fn recipes(&self) -> RecipeManager {
        RecipeManager::new(self.pool.clone())
    }

    /// Favorites and shopping cart
    #[must_use]
    pub fn relations(&self) -> RelationManager {
        RelationManager::new(self.pool.clone())
    }

    /// Author subscriptions
    #[must_use]
    pub fn follows(&self) -> FollowManager {
        FollowManager::new(self.pool.clone())
    }

    /// Shopping list aggregation
    #[must_use]
    pub fn shopping_list(&self) -> ShoppingListManager {
        ShoppingListManager::new(self.pool.clone())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_users().await?;
        self.migrate_catalogue().await?;
        self.migrate_recipes().await?;
        self.migrate_relations().await?;
        Ok(())
    }

    async fn execute_all(&self, statements: &[&str]) -> AppResult<()> {
        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }
        Ok(())
    }

    async fn migrate_users(&self) -> AppResult<()> {
        self.execute_all(&[r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE CHECK (length(email) <= 254),
                username TEXT NOT NULL UNIQUE CHECK (length(username) <= 150),
                first_name TEXT NOT NULL CHECK (length(first_name) <= 150),
                last_name TEXT NOT NULL CHECK (length(last_name) <= 150),
                password_hash TEXT NOT NULL,
                avatar TEXT,
                date_joined TEXT NOT NULL
            )
            "])
        .await
    }

    async fn migrate_catalogue(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE CHECK (length(name) <= 32),
                slug TEXT NOT NULL UNIQUE CHECK (length(slug) <= 32)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL CHECK (length(name) <= 128),
                measurement_unit TEXT NOT NULL CHECK (length(measurement_unit) <= 64),
                UNIQUE (name, measurement_unit)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_ingredients_name ON ingredients(name)",
        ])
        .await
    }

    async fn migrate_recipes(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                name TEXT NOT NULL CHECK (length(name) <= 256),
                text TEXT NOT NULL,
                cooking_time INTEGER NOT NULL CHECK (cooking_time >= 1),
                image TEXT NOT NULL,
                pub_date TEXT NOT NULL,
                short_link TEXT UNIQUE CHECK (length(short_link) <= 16)
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_recipes_pub_date ON recipes(pub_date DESC)",
            "CREATE INDEX IF NOT EXISTS idx_recipes_author ON recipes(author_id)",
            r"
            CREATE TABLE IF NOT EXISTS recipe_ingredients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                ingredient_id INTEGER NOT NULL REFERENCES ingredients(id) ON DELETE CASCADE,
                amount INTEGER NOT NULL CHECK (amount >= 1),
                UNIQUE (recipe_id, ingredient_id)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS recipe_tags (
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
                PRIMARY KEY (recipe_id, tag_id)
            )
            ",
        ])
        .await
    }

    async fn migrate_relations(&self) -> AppResult<()> {
        self.execute_all(&[
            r"
            CREATE TABLE IF NOT EXISTS favorites (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                UNIQUE (user_id, recipe_id)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS shopping_cart (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                UNIQUE (user_id, recipe_id)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS follows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                UNIQUE (user_id, author_id),
                CHECK (user_id <> author_id)
            )
            ",
        ])
        .await
    }
}

/// Whether a sqlx error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

/// Fixed-width RFC 3339 timestamp so stored values sort lexically
pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp
pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Invalid stored timestamp '{value}': {e}")))
}

/// Comma-separated `?` placeholders for an `IN (...)` list
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
