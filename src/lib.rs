// ABOUTME: Main library entry point for the Foodgram recipe-sharing API
// ABOUTME: Wires configuration, storage, authentication, services and HTTP routes together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![deny(unsafe_code)]

//! # Foodgram Server
//!
//! A REST backend for publishing recipes. Users register, publish recipes
//! with tags and ingredient quantities, follow authors, keep favorites and
//! build a shopping cart that can be downloaded as an aggregated list.
//!
//! ## Architecture
//!
//! - **database**: `SQLite` schema and per-domain managers
//! - **services**: payload validation, media storage, short links and list rendering
//! - **routes**: `axum` routers, one per resource
//! - **middleware**: authentication, CORS and request tracing
//! - **server**: router assembly, layers and graceful shutdown
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use foodgram_server::config::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("Foodgram configured on port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT issuing/validation and password hashing
pub mod auth;

/// Environment-driven server configuration
pub mod config;

/// Routing and default constants
pub mod constants;

/// `SQLite` storage layer
pub mod database;

/// Error types re-exported from `foodgram-core`
pub mod errors;

/// Tracing subscriber setup
pub mod logging;

/// HTTP middleware: authentication, CORS and tracing
pub mod middleware;

/// Domain models re-exported from `foodgram-core`
pub mod models;

/// Pagination envelopes re-exported from `foodgram-core`
pub mod pagination;

/// Shared resource container for handlers
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Router assembly and server lifecycle
pub mod server;

/// Domain services used by the route handlers
pub mod services;
