// ABOUTME: Route module organization for the Foodgram REST API
// ABOUTME: One router per domain, merged by the server into a single application
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! Route modules
//!
//! Each domain module exposes an `XxxRoutes::routes(resources)` constructor
//! with full paths and thin handlers that delegate to the database managers
//! and the service layer.

/// Health check route
pub mod health;
/// Ingredient catalogue routes
pub mod ingredients;
/// JSON body extractor with structured rejections
pub mod json;
/// Query string helpers for filters and pagination links
pub mod query;
/// Recipe CRUD, favorites, cart and shopping list routes
pub mod recipes;
/// Short link redirect route
pub mod short_links;
/// Tag catalogue routes
pub mod tags;
/// Account, profile and subscription routes
pub mod users;

pub use health::HealthRoutes;
pub use ingredients::IngredientRoutes;
pub use recipes::{RecipeResponse, RecipeRoutes, RecipeShortResponse, ShortLinkResponse};
pub use short_links::ShortLinkRoutes;
pub use tags::TagRoutes;
pub use users::{
    AvatarResponse, RegisteredUserResponse, SubscriptionResponse, UserResponse, UserRoutes,
};
