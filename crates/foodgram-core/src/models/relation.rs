// ABOUTME: User-recipe and user-author relation types for favorites, cart, and follows
// ABOUTME: Also defines the aggregated shopping list line and its text rendering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

/// Join tables linking a user to a recipe
///
/// Both relations are pure join rows: toggled in and out, never updated.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecipeRelation {
    /// Bookmarked recipe
    Favorite,
    /// Recipe whose ingredients go into the shopping list
    ShoppingCart,
}

impl RecipeRelation {
    /// Backing table name
    #[must_use]
    pub const fn table(&self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "shopping_cart",
        }
    }

    /// Human-readable collection name used in messages
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::ShoppingCart => "shopping cart",
        }
    }
}

impl Display for RecipeRelation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.label())
    }
}

/// Subscription of `user_id` to the recipes of `author_id`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Follow {
    /// Follower
    pub user_id: i64,
    /// Followed author, never equal to `user_id`
    pub author_id: i64,
}

/// One aggregated line of the shopping list
///
/// Lines are keyed by name and unit together, so the same ingredient measured
/// in two units yields two lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingListItem {
    /// Ingredient name
    pub name: String,
    /// Ingredient unit
    pub measurement_unit: String,
    /// Sum of amounts across the cart
    pub total_amount: i64,
}

impl Display for ShoppingListItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} - {} ({})",
            self.name, self.total_amount, self.measurement_unit
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shopping_list_item_display() {
        let item = ShoppingListItem {
            name: "salt".to_owned(),
            measurement_unit: "g".to_owned(),
            total_amount: 15,
        };
        assert_eq!(item.to_string(), "salt - 15 (g)");
    }

    #[test]
    fn test_relation_tables() {
        assert_eq!(RecipeRelation::Favorite.table(), "favorites");
        assert_eq!(RecipeRelation::ShoppingCart.table(), "shopping_cart");
    }
}
