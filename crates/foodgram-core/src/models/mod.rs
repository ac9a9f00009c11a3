// ABOUTME: Core data models for the Foodgram recipe-sharing backend
// ABOUTME: Re-exports users, tags, ingredients, recipes, and user-recipe relation types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Data Models
//!
//! Plain data structures mirrored by the storage schema. Identifiers are the
//! 64-bit row ids assigned by the database.

mod recipe;
mod relation;
mod user;

pub use recipe::{
    Ingredient, IngredientAmount, IngredientLine, Recipe, RecipeChanges, RecipeDetail,
    RecipeFilter, Tag,
};
pub use relation::{Follow, RecipeRelation, ShoppingListItem};
pub use user::{NewUser, User, UserProfile, UserUpdate};
