// ABOUTME: Core types and constants for the Foodgram recipe-sharing backend
// ABOUTME: Foundation crate with error handling, domain models, pagination, and limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

#![deny(unsafe_code)]

//! # Foodgram Core
//!
//! Foundation crate providing shared types and constants for the Foodgram
//! backend. This crate changes rarely so the server crate can rebuild
//! incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and field-level validation errors
//! - **constants**: Field limits, validation patterns and pagination defaults
//! - **models**: Users, tags, ingredients, recipes and the user-recipe relations
//! - **pagination**: Page-number pagination request and response envelopes

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Field limits and defaults shared by validation and storage
pub mod constants;

/// Domain models (User, Tag, Ingredient, Recipe, relations)
pub mod models;

/// Page-number pagination envelopes
pub mod pagination;
