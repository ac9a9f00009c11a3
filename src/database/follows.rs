// ABOUTME: Author subscriptions stored as unique follower-author pairs
// ABOUTME: Lists followed authors with the subscription flag already resolved
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use sqlx::SqlitePool;
use tracing::info;

use super::{is_unique_violation, UserManager};
use crate::errors::{AppError, AppResult};
use crate::models::{Follow, UserProfile};
use crate::pagination::PageRequest;

/// Subscription database operations
pub struct FollowManager {
    pool: SqlitePool,
}

impl FollowManager {
    /// Create a new follow manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Subscribe `user_id` to `author_id`
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` for a self-subscription,
    /// `RESOURCE_ALREADY_EXISTS` if already subscribed, or a database error
    pub async fn follow(&self, user_id: i64, author_id: i64) -> AppResult<Follow> {
        if user_id == author_id {
            return Err(AppError::invalid_input("You cannot subscribe to yourself"));
        }

        sqlx::query("INSERT INTO follows (user_id, author_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::already_exists("You are already subscribed to this author")
                } else {
                    AppError::database(format!("Failed to subscribe: {e}"))
                }
            })?;

        info!(user_id, author_id, "Subscribed to author");
        Ok(Follow { user_id, author_id })
    }

    /// Unsubscribe; returns `false` when no subscription existed
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn unfollow(&self, user_id: i64, author_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to unsubscribe: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Authors followed by `user_id`, ordered by subscription time
    ///
    /// Returns the page of authors and the total number of subscriptions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_following(
        &self,
        user_id: i64,
        page: PageRequest,
    ) -> AppResult<(Vec<UserProfile>, i64)> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count subscriptions: {e}")))?;

        let rows = sqlx::query(
            r"
            SELECT u.id, u.email, u.username, u.first_name, u.last_name, u.password_hash,
                   u.avatar, u.date_joined, 1 AS is_subscribed
            FROM follows f
            JOIN users u ON u.id = f.author_id
            WHERE f.user_id = ?
            ORDER BY f.id
            LIMIT ? OFFSET ?
            ",
        )
        .bind(user_id)
        .bind(page.sql_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list subscriptions: {e}")))?;

        let authors = rows
            .iter()
            .map(UserManager::row_to_profile)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((authors, count))
    }
}
