// ABOUTME: User account model with login identity and profile fields
// ABOUTME: Separates stored users from registration input awaiting an id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user
///
/// `email` is the login identifier. `avatar` holds the media-relative path of
/// the uploaded image, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Row id
    pub id: i64,
    /// Unique email address
    pub email: String,
    /// Unique public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Media-relative avatar path
    pub avatar: Option<String>,
    /// Registration time
    pub date_joined: DateTime<Utc>,
}

/// Validated registration data waiting to be stored
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique email address
    pub email: String,
    /// Unique public handle
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// bcrypt hash of the password
    pub password_hash: String,
}

/// User as seen by a particular caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Stored user
    pub user: User,
    /// Whether the caller follows this user; false for anonymous callers
    pub is_subscribed: bool,
}

/// Partial profile update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New email
    pub email: Option<String>,
    /// New username
    pub username: Option<String>,
    /// New given name
    pub first_name: Option<String>,
    /// New family name
    pub last_name: Option<String>,
}

impl UserUpdate {
    /// Whether no field is set
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
    }
}
