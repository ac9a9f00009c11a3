// ABOUTME: Domain constants for field lengths, numeric bounds, and pagination defaults
// ABOUTME: Shared by payload validation, schema creation, and configuration defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Constants module
//!
//! Limits are grouped by domain. Column sizes mirror the `CHECK` constraints
//! created by the storage layer.

/// User account limits
pub mod users {
    /// Maximum email length
    pub const MAX_EMAIL_LENGTH: usize = 254;
    /// Maximum username length
    pub const MAX_USERNAME_LENGTH: usize = 150;
    /// Maximum first name length
    pub const MAX_FIRST_NAME_LENGTH: usize = 150;
    /// Maximum last name length
    pub const MAX_LAST_NAME_LENGTH: usize = 150;
    /// Maximum raw password length accepted before hashing (bcrypt truncates at 72 bytes)
    pub const MAX_PASSWORD_LENGTH: usize = 72;
    /// Minimum raw password length
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Allowed username characters: letters, digits and `.@+-_`
    pub const USERNAME_PATTERN: &str = r"^[\w.@+-]+$";
    /// Username reserved for the current-user endpoint
    pub const RESERVED_USERNAME: &str = "me";
}

/// Recipe, tag and ingredient limits
pub mod recipes {
    /// Maximum tag name length
    pub const MAX_TAG_NAME_LENGTH: usize = 32;
    /// Maximum tag slug length
    pub const MAX_TAG_SLUG_LENGTH: usize = 32;
    /// Allowed slug characters
    pub const SLUG_PATTERN: &str = r"^[-a-zA-Z0-9_]+$";
    /// Maximum ingredient name length
    pub const MAX_INGREDIENT_NAME_LENGTH: usize = 128;
    /// Maximum measurement unit length
    pub const MAX_MEASUREMENT_UNIT_LENGTH: usize = 64;
    /// Maximum recipe name length
    pub const MAX_RECIPE_NAME_LENGTH: usize = 256;
    /// Minimum cooking time in minutes
    pub const MIN_COOKING_TIME: i64 = 1;
    /// Maximum cooking time in minutes
    pub const MAX_COOKING_TIME: i64 = 32_000;
    /// Minimum amount of a single ingredient
    pub const MIN_INGREDIENT_AMOUNT: i64 = 1;
    /// Default upper bound for a single ingredient amount
    pub const DEFAULT_MAX_INGREDIENT_AMOUNT: i64 = 32_000;
    /// Maximum stored short link length
    pub const MAX_SHORT_LINK_LENGTH: usize = 16;
}

/// Pagination defaults
pub mod pagination {
    /// Default page size when `limit` is absent
    pub const DEFAULT_PAGE_SIZE: u32 = 6;
    /// Hard cap on `limit`
    pub const MAX_PAGE_SIZE: u32 = 100;
}

/// Shopping list export
pub mod shopping_list {
    /// Download filename for the exported list
    pub const FILENAME: &str = "shopping_list.txt";
}
