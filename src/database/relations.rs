// ABOUTME: Favorite and shopping cart membership stored as unique user-recipe pairs
// ABOUTME: Both relations share one manager parameterised by RecipeRelation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use sqlx::SqlitePool;
use tracing::debug;

use super::is_unique_violation;
use crate::errors::{AppError, AppResult};
use crate::models::RecipeRelation;

/// Favorite and shopping cart database operations
pub struct RelationManager {
    pool: SqlitePool,
}

impl RelationManager {
    /// Create a new relation manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a recipe to the user's favorites or cart
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if the pair is already present, or a
    /// database error
    pub async fn add(&self, relation: RecipeRelation, user_id: i64, recipe_id: i64) -> AppResult<()> {
        let sql = format!(
            "INSERT INTO {} (user_id, recipe_id) VALUES (?, ?)",
            relation.table()
        );
        sqlx::query(&sql)
            .bind(user_id)
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::already_exists(format!("Recipe is already in {}", relation.label()))
                } else {
                    AppError::database(format!("Failed to add recipe to {}: {e}", relation.label()))
                }
            })?;

        debug!(user_id, recipe_id, relation = %relation, "Relation added");
        Ok(())
    }

    /// Remove a recipe from the user's favorites or cart
    ///
    /// Returns `false` when the pair was not present.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn remove(
        &self,
        relation: RecipeRelation,
        user_id: i64,
        recipe_id: i64,
    ) -> AppResult<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE user_id = ? AND recipe_id = ?",
            relation.table()
        );
        let result = sqlx::query(&sql)
            .bind(user_id)
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::database(format!(
                    "Failed to remove recipe from {}: {e}",
                    relation.label()
                ))
            })?;

        Ok(result.rows_affected() > 0)
    }
}
