// ABOUTME: Query string access for filters that repeat keys and for pagination links
// ABOUTME: Parses raw form-encoded pairs once and rebuilds page links without page/limit
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use url::form_urlencoded;

use crate::errors::{AppResult, ValidationErrors};
use crate::pagination::PageParams;

const PAGE: &str = "page";
const LIMIT: &str = "limit";

/// Decoded query string pairs in request order
#[derive(Debug, Clone, Default)]
pub struct QueryPairs {
    pairs: Vec<(String, String)>,
}

impl QueryPairs {
    /// Decode a raw query string; `None` yields no pairs
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|query| form_urlencoded::parse(query.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// Every non-empty value of a repeated key
    #[must_use]
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// First non-empty value of a key
    #[must_use]
    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// Boolean filter flag: `1` or `true`
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.first(key)
            .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
    }

    /// Every value of a repeated integer key
    ///
    /// # Errors
    ///
    /// Returns a field error when a value is not an integer
    pub fn ids(&self, key: &str) -> AppResult<Vec<i64>> {
        let mut errors = ValidationErrors::new();
        let ids = self
            .all(key)
            .into_iter()
            .filter_map(|value| {
                value.parse().map_or_else(
                    |_| {
                        errors.add(key, format!("'{value}' is not a valid id."));
                        None
                    },
                    Some,
                )
            })
            .collect();
        errors.into_result()?;
        Ok(ids)
    }

    /// Pagination parameters
    ///
    /// # Errors
    ///
    /// Returns a field error when `page` or `limit` is not a positive integer
    pub fn page_params(&self) -> AppResult<PageParams> {
        let mut errors = ValidationErrors::new();
        let mut number = |key: &str| {
            self.first(key).and_then(|value| {
                value.parse::<u32>().map_or_else(
                    |_| {
                        errors.add(key, "A positive integer is required.");
                        None
                    },
                    Some,
                )
            })
        };
        let params = PageParams {
            page: number(PAGE),
            limit: number(LIMIT),
        };
        errors.into_result()?;
        Ok(params)
    }

    /// Optional non-negative integer, ignored when not numeric
    #[must_use]
    pub fn lenient_number(&self, key: &str) -> Option<i64> {
        self.first(key)
            .filter(|value| value.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|value| value.parse().ok())
    }

    /// Absolute link base for pagination: `{base_url}{path}` plus every pair
    /// except `page` and `limit`
    #[must_use]
    pub fn link_base(&self, base_url: &str, path: &str) -> String {
        let kept: Vec<&(String, String)> = self
            .pairs
            .iter()
            .filter(|(k, _)| k != PAGE && k != LIMIT)
            .collect();
        let base = format!("{}{path}", base_url.trim_end_matches('/'));
        if kept.is_empty() {
            return base;
        }

        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(kept)
            .finish();
        format!("{base}?{query}")
    }
}
