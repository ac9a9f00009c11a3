// ABOUTME: System-wide constants for field limits, service identity, and environment keys
// ABOUTME: Re-exports domain limits from foodgram-core and adds server-only values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Constants Module
//!
//! Domain limits live in `foodgram-core`; this module adds values that only
//! the server needs.

pub use foodgram_core::constants::{pagination, recipes, shopping_list, users};

/// Service identity used in structured logs
pub mod service_names {
    /// Default service name
    pub const FOODGRAM_SERVER: &str = "foodgram-server";
}

/// Server defaults applied when the matching environment variable is unset
pub mod defaults {
    /// HTTP port
    pub const HTTP_PORT: u16 = 8000;
    /// Bind address
    pub const HOST: &str = "0.0.0.0";
    /// SQLite database location
    pub const DATABASE_URL: &str = "sqlite:./data/foodgram.db";
    /// Connection pool size
    pub const DATABASE_MAX_CONNECTIONS: u32 = 5;
    /// JWT lifetime
    pub const JWT_EXPIRY_HOURS: i64 = 24;
    /// Directory uploaded images are written to
    pub const MEDIA_ROOT: &str = "./media";
    /// Public origin used to build absolute media and short-link URLs
    pub const PUBLIC_BASE_URL: &str = "http://localhost:8000";
    /// Per-request timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
    /// Largest accepted request body; base64 images dominate
    pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
}

/// Route prefixes
pub mod routes {
    /// Public media URL prefix
    pub const MEDIA_PREFIX: &str = "/media";
    /// Short link prefix
    pub const SHORT_LINK_PREFIX: &str = "/s";
    /// Frontend recipe page a short link redirects to
    pub const RECIPE_PAGE_PREFIX: &str = "/recipes";
}
