// ABOUTME: Recipe catalogue models for tags, ingredients, recipes and ingredient amounts
// ABOUTME: Recipes own their ingredient amounts and tag links; both are replaced as a whole
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recipe label used for filtering (breakfast, lunch, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    /// Row id
    pub id: i64,
    /// Unique display name
    pub name: String,
    /// Unique URL-safe slug used by the `tags` filter
    pub slug: String,
}

/// Ingredient from the shared catalogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    /// Row id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Unit the amount is expressed in (g, ml, pcs)
    pub measurement_unit: String,
}

/// Ingredient as used by a specific recipe
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientAmount {
    /// Ingredient row id
    pub id: i64,
    /// Ingredient name
    pub name: String,
    /// Ingredient unit
    pub measurement_unit: String,
    /// Quantity, at least 1
    pub amount: i64,
}

/// Recipe row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recipe {
    /// Row id
    pub id: i64,
    /// Owning user
    pub author_id: i64,
    /// Dish name
    pub name: String,
    /// Preparation instructions
    pub text: String,
    /// Minutes, at least 1
    pub cooking_time: i64,
    /// Media-relative image path
    pub image: String,
    /// Publication time; collections are ordered by it, newest first
    pub pub_date: DateTime<Utc>,
    /// Base62 short code, unique
    pub short_link: Option<String>,
}

/// Ingredient id and quantity as submitted in a recipe payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngredientLine {
    /// Ingredient row id
    pub id: i64,
    /// Quantity
    pub amount: i64,
}

/// Validated recipe write
///
/// On create every scalar field is present. On update `None` keeps the stored
/// value. The ingredient and tag sets are always replaced as a whole.
#[derive(Debug, Clone, Default)]
pub struct RecipeChanges {
    /// Dish name
    pub name: Option<String>,
    /// Preparation instructions
    pub text: Option<String>,
    /// Minutes
    pub cooking_time: Option<i64>,
    /// Media-relative image path of an already stored image
    pub image: Option<String>,
    /// Full ingredient set
    pub ingredients: Vec<IngredientLine>,
    /// Full tag set
    pub tags: Vec<i64>,
}

/// Recipe with its associations, annotated for a particular caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetail {
    /// Recipe row
    pub recipe: Recipe,
    /// Author as seen by the caller
    pub author: super::UserProfile,
    /// Tags ordered by name
    pub tags: Vec<Tag>,
    /// Ingredients in submission order
    pub ingredients: Vec<IngredientAmount>,
    /// Whether the caller favorited the recipe
    pub is_favorited: bool,
    /// Whether the recipe is in the caller's shopping cart
    pub is_in_shopping_cart: bool,
}

/// Recipe collection filters
///
/// Tag slugs and author ids are OR-ed within their own list and AND-ed with
/// each other. The two flags only apply to authenticated callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Tag slugs
    pub tags: Vec<String>,
    /// Author ids
    pub authors: Vec<i64>,
    /// Only recipes the caller favorited
    pub is_favorited: bool,
    /// Only recipes in the caller's shopping cart
    pub is_in_shopping_cart: bool,
}
