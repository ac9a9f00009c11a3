// ABOUTME: Shopping list aggregation over every recipe in a user's cart
// ABOUTME: Sums amounts per ingredient name and unit in one grouped query
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use sqlx::{Row, SqlitePool};

use crate::errors::{AppError, AppResult};
use crate::models::ShoppingListItem;

/// Shopping list database operations
pub struct ShoppingListManager {
    pool: SqlitePool,
}

impl ShoppingListManager {
    /// Create a new shopping list manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Aggregate the user's cart into one line per ingredient and unit
    ///
    /// Lines are ordered alphabetically by ingredient name ignoring case, then unit. An empty cart yields
    /// an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn aggregate(&self, user_id: i64) -> AppResult<Vec<ShoppingListItem>> {
        let rows = sqlx::query(
            r"
            SELECT i.name, i.measurement_unit, SUM(ri.amount) AS total_amount
            FROM shopping_cart sc
            JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sc.user_id = ?
            GROUP BY i.name, i.measurement_unit
            ORDER BY i.name COLLATE NOCASE, i.name, i.measurement_unit
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to build shopping list: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| ShoppingListItem {
                name: row.get("name"),
                measurement_unit: row.get("measurement_unit"),
                total_amount: row.get("total_amount"),
            })
            .collect())
    }
}
