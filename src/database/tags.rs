// ABOUTME: Tag catalogue storage with name ordering and existence checks
// ABOUTME: Tags are created by operators and read by everyone
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashSet;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{is_unique_violation, placeholders};
use crate::errors::{AppError, AppResult};
use crate::models::Tag;

/// Tag catalogue database operations
pub struct TagManager {
    pool: SqlitePool,
}

impl TagManager {
    /// Create a new tag manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a tag
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if the name or slug is taken, or a
    /// database error
    pub async fn create_tag(&self, name: &str, slug: &str) -> AppResult<Tag> {
        let result = sqlx::query("INSERT INTO tags (name, slug) VALUES (?, ?)")
            .bind(name)
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::already_exists(format!("Tag '{slug}' already exists"))
                } else {
                    AppError::database(format!("Failed to create tag: {e}"))
                }
            })?;

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
            slug: slug.to_owned(),
        })
    }

    /// List all tags ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_tags(&self) -> AppResult<Vec<Tag>> {
        let rows = sqlx::query("SELECT id, name, slug FROM tags ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to list tags: {e}")))?;

        Ok(rows.iter().map(Self::row_to_tag).collect())
    }

    /// Get a tag by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_tag(&self, id: i64) -> AppResult<Option<Tag>> {
        let row = sqlx::query("SELECT id, name, slug FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get tag: {e}")))?;

        Ok(row.as_ref().map(Self::row_to_tag))
    }

    /// Return the ids from `ids` that have no tag row
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn find_missing(&self, ids: &[i64]) -> AppResult<Vec<i64>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT id FROM tags WHERE id IN ({})",
            placeholders(ids.len())
        );
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for id in ids {
            query = query.bind(id);
        }
        let found: HashSet<i64> = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check tags: {e}")))?
            .into_iter()
            .collect();

        Ok(ids.iter().copied().filter(|id| !found.contains(id)).collect())
    }

    pub(crate) fn row_to_tag(row: &SqliteRow) -> Tag {
        Tag {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
        }
    }
}
