// ABOUTME: HTTP middleware for authentication, CORS and request tracing
// ABOUTME: Route handlers call into AuthMiddleware; the rest is layered onto the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

pub mod auth;
pub mod cors;
pub mod tracing;

// Authentication middleware
pub use auth::AuthMiddleware;

// CORS configuration
pub use cors::setup_cors;

// Request tracing
pub use tracing::{log_failure, log_response, make_request_span, REQUEST_ID_HEADER};
