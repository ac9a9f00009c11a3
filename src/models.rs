// ABOUTME: Re-exports domain models from foodgram-core
// ABOUTME: Users, tags, ingredients, recipes and user-recipe relations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

pub use foodgram_core::models::*;
