// ABOUTME: User account storage for registration, lookup, profile edits and avatars
// ABOUTME: Annotates users with the caller's subscription state in a single query
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::collections::HashMap;

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::info;

use super::{format_timestamp, is_unique_violation, parse_timestamp, placeholders};
use crate::errors::{AppError, AppResult};
use crate::models::{NewUser, User, UserProfile, UserUpdate};
use crate::pagination::PageRequest;

const USER_COLUMNS: &str =
    "u.id, u.email, u.username, u.first_name, u.last_name, u.password_hash, u.avatar, u.date_joined";

/// User account database operations
pub struct UserManager {
    pool: SqlitePool,
}

impl UserManager {
    /// Create a new user manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if the email or username is taken,
    /// or a database error
    pub async fn create_user(&self, new_user: &NewUser) -> AppResult<User> {
        let date_joined = Utc::now();
        let result = sqlx::query(
            r"
            INSERT INTO users (email, username, first_name, last_name, password_hash, date_joined)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.password_hash)
        .bind(format_timestamp(date_joined))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("A user with this email or username already exists")
            } else {
                AppError::database(format!("Failed to create user: {e}"))
            }
        })?;

        let id = result.last_insert_rowid();
        info!(user_id = id, username = %new_user.username, "User registered");

        Ok(User {
            id,
            email: new_user.email.clone(),
            username: new_user.username.clone(),
            first_name: new_user.first_name.clone(),
            last_name: new_user.last_name.clone(),
            password_hash: new_user.password_hash.clone(),
            avatar: None,
            date_joined,
        })
    }

    /// Get a user by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user(&self, id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users u WHERE u.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get user: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Get a user by login email
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users u WHERE u.email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user by email: {e}")))?;

        row.map(|r| Self::row_to_user(&r)).transpose()
    }

    /// Get a user annotated with whether `viewer_id` follows them
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_profile(
        &self,
        id: i64,
        viewer_id: Option<i64>,
    ) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query(&format!(
            r"
            SELECT {USER_COLUMNS},
                   EXISTS (SELECT 1 FROM follows f WHERE f.user_id = ? AND f.author_id = u.id) AS is_subscribed
            FROM users u
            WHERE u.id = ?
            "
        ))
        .bind(viewer_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get user profile: {e}")))?;

        row.map(|r| Self::row_to_profile(&r)).transpose()
    }

    /// Load several users at once, keyed by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_profiles(
        &self,
        ids: &[i64],
        viewer_id: Option<i64>,
    ) -> AppResult<HashMap<i64, UserProfile>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            r"
            SELECT {USER_COLUMNS},
                   EXISTS (SELECT 1 FROM follows f WHERE f.user_id = ? AND f.author_id = u.id) AS is_subscribed
            FROM users u
            WHERE u.id IN ({})
            ",
            placeholders(ids.len())
        );
        let mut query = sqlx::query(&sql).bind(viewer_id);
        for id in ids {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to load user profiles: {e}")))?;

        rows.iter()
            .map(|row| Self::row_to_profile(row).map(|profile| (profile.user.id, profile)))
            .collect()
    }

    /// List users ordered by id, annotated for `viewer_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_profiles(
        &self,
        viewer_id: Option<i64>,
        page: PageRequest,
    ) -> AppResult<(Vec<UserProfile>, i64)> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count users: {e}")))?;

        let rows = sqlx::query(&format!(
            r"
            SELECT {USER_COLUMNS},
                   EXISTS (SELECT 1 FROM follows f WHERE f.user_id = ? AND f.author_id = u.id) AS is_subscribed
            FROM users u
            ORDER BY u.id
            LIMIT ? OFFSET ?
            "
        ))
        .bind(viewer_id)
        .bind(page.sql_limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list users: {e}")))?;

        let profiles = rows
            .iter()
            .map(Self::row_to_profile)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((profiles, count))
    }

    /// Whether the email or username is already used by another account
    ///
    /// Returns `(email_taken, username_taken)`. `exclude_id` skips the caller's
    /// own row when checking a profile update.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn find_conflicts(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        exclude_id: Option<i64>,
    ) -> AppResult<(bool, bool)> {
        let row = sqlx::query(
            r"
            SELECT
                EXISTS (SELECT 1 FROM users WHERE email = ? AND id IS NOT ?) AS email_taken,
                EXISTS (SELECT 1 FROM users WHERE username = ? AND id IS NOT ?) AS username_taken
            ",
        )
        .bind(email)
        .bind(exclude_id)
        .bind(username)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to check user uniqueness: {e}")))?;

        Ok((row.get("email_taken"), row.get("username_taken")))
    }

    /// Apply a partial profile update
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if the new email or username is
    /// taken, `RESOURCE_NOT_FOUND` if the user is gone, or a database error
    pub async fn update_profile(&self, id: i64, update: &UserUpdate) -> AppResult<User> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET email = COALESCE(?, email),
                username = COALESCE(?, username),
                first_name = COALESCE(?, first_name),
                last_name = COALESCE(?, last_name)
            WHERE id = ?
            ",
        )
        .bind(update.email.as_deref())
        .bind(update.username.as_deref())
        .bind(update.first_name.as_deref())
        .bind(update.last_name.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::already_exists("A user with this email or username already exists")
            } else {
                AppError::database(format!("Failed to update user: {e}"))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("User {id}")));
        }

        self.get_user(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id}")))
    }

    /// Replace the stored password hash
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_password(&self, id: i64, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update password: {e}")))?;

        info!(user_id = id, "Password changed");
        Ok(())
    }

    /// Set or clear the avatar path, returning the previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn set_avatar(&self, id: i64, avatar: Option<&str>) -> AppResult<Option<String>> {
        let previous: Option<Option<String>> =
            sqlx::query_scalar("SELECT avatar FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to read avatar: {e}")))?;

        sqlx::query("UPDATE users SET avatar = ? WHERE id = ?")
            .bind(avatar)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update avatar: {e}")))?;

        Ok(previous.flatten())
    }

    pub(crate) fn row_to_user(row: &SqliteRow) -> AppResult<User> {
        let date_joined: String = row.get("date_joined");
        Ok(User {
            id: row.get("id"),
            email: row.get("email"),
            username: row.get("username"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            password_hash: row.get("password_hash"),
            avatar: row.get("avatar"),
            date_joined: parse_timestamp(&date_joined)?,
        })
    }

    pub(crate) fn row_to_profile(row: &SqliteRow) -> AppResult<UserProfile> {
        Ok(UserProfile {
            user: Self::row_to_user(row)?,
            is_subscribed: row.get("is_subscribed"),
        })
    }
}
