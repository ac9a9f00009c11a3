// ABOUTME: Domain service layer for logic shared by route handlers and benchmarks
// ABOUTME: Payload validation, short link codes, media storage and shopping list export
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Domain service layer
//!
//! Pure logic lives here so route handlers stay thin and the same rules can be
//! exercised directly from unit tests and benchmarks.

/// Base64 data URI decoding and on-disk media storage
pub mod media;

/// Plain-text rendering of the aggregated shopping list
pub mod shopping_list;

/// Base62 short codes for recipe links
pub mod short_link;

/// Field-level validation for recipe and user payloads
pub mod validation;
