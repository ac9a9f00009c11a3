// ABOUTME: Renders aggregated shopping list lines into the downloadable text file
// ABOUTME: One "name - total (unit)" line per ingredient and unit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use crate::constants::shopping_list::FILENAME;
use crate::models::ShoppingListItem;

/// Render the list as newline-separated text; an empty list renders as ""
#[must_use]
pub fn render(items: &[ShoppingListItem]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Content-Disposition` header value for the download
#[must_use]
pub fn content_disposition() -> String {
    format!("attachment; filename=\"{FILENAME}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, unit: &str, total_amount: i64) -> ShoppingListItem {
        ShoppingListItem {
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            total_amount,
        }
    }

    #[test]
    fn test_render_lines() {
        let text = render(&[item("salt", "g", 15), item("water", "ml", 500)]);
        assert_eq!(text, "salt - 15 (g)\nwater - 500 (ml)");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition(),
            "attachment; filename=\"shopping_list.txt\""
        );
    }
}
