// ABOUTME: Ingredient catalogue storage with case-insensitive prefix search
// ABOUTME: Ingredients are created by operators and referenced by recipe ingredient rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{is_unique_violation, placeholders};
use crate::errors::{AppError, AppResult};
use crate::models::Ingredient;

/// Ingredient catalogue database operations
pub struct IngredientManager {
    pool: SqlitePool,
}

impl IngredientManager {
    /// Create a new ingredient manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an ingredient
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if the same name and unit pair
    /// exists, or a database error
    pub async fn create_ingredient(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> AppResult<Ingredient> {
        let result =
            sqlx::query("INSERT INTO ingredients (name, measurement_unit) VALUES (?, ?)")
                .bind(name)
                .bind(measurement_unit)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        AppError::already_exists(format!(
                            "Ingredient '{name}' ({measurement_unit}) already exists"
                        ))
                    } else {
                        AppError::database(format!("Failed to create ingredient: {e}"))
                    }
                })?;

        Ok(Ingredient {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        })
    }

    /// List ingredients ordered by name, optionally filtered by name prefix
    ///
    /// SQLite only folds ASCII case, so the prefix match compares lowercased
    /// names after loading.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_ingredients(&self, name_prefix: Option<&str>) -> AppResult<Vec<Ingredient>> {
        let rows = sqlx::query(
            "SELECT id, name, measurement_unit FROM ingredients ORDER BY name, measurement_unit",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list ingredients: {e}")))?;

        let prefix = name_prefix
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_lowercase);

        Ok(rows
            .iter()
            .map(Self::row_to_ingredient)
            .filter(|ingredient| match prefix.as_deref() {
                Some(p) => ingredient.name.to_lowercase().starts_with(p),
                None => true,
            })
            .collect())
    }

    /// Get an ingredient by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_ingredient(&self, id: i64) -> AppResult<Option<Ingredient>> {
        let row = sqlx::query("SELECT id, name, measurement_unit FROM ingredients WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get ingredient: {e}")))?;

        Ok(row.as_ref().map(Self::row_to_ingredient))
    }

    /// Return the ids from `ids` that have no ingredient row
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn find_missing(&self, ids: &[i64]) -> AppResult<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id FROM ingredients WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        let found: HashSet<i64> = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check ingredients: {e}")))?
            .into_iter()
            .collect();

        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }

    fn row_to_ingredient(row: &SqliteRow) -> Ingredient {
        Ingredient {
            id: row.get("id"),
            name: row.get("name"),
            measurement_unit: row.get("measurement_unit"),
        }
    }
}
