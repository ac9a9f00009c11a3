// ABOUTME: Page-number pagination driven by `page` and `limit` query parameters
// ABOUTME: Provides the request parser and the {count, next, previous, results} envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use serde::{Deserialize, Serialize};

use crate::constants::pagination::MAX_PAGE_SIZE;

/// Pagination parameters as received from the query string
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct PageParams {
    /// 1-based page number
    pub page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
}

impl PageParams {
    /// Resolve missing or out-of-range values into a concrete request
    ///
    /// A zero page is treated as the first page. The limit falls back to
    /// `default_limit` and is capped at [`MAX_PAGE_SIZE`].
    #[must_use]
    pub fn resolve(self, default_limit: u32) -> PageRequest {
        let limit = self
            .limit
            .filter(|limit| *limit > 0)
            .unwrap_or(default_limit)
            .clamp(1, MAX_PAGE_SIZE);
        let page = self.page.filter(|page| *page > 0).unwrap_or(1);
        PageRequest { page, limit }
    }
}

/// Fully resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl PageRequest {
    /// Row offset for SQL `OFFSET`
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    /// Page size for SQL `LIMIT`
    #[must_use]
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

/// Paginated response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    pub count: i64,
    /// Link to the next page, if any
    pub next: Option<String>,
    /// Link to the previous page, if any
    pub previous: Option<String>,
    /// Items on this page
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build a page and its navigation links
    ///
    /// `link_base` is the absolute request URL stripped of `page` and `limit`;
    /// it may already carry other query parameters.
    #[must_use]
    pub fn new(results: Vec<T>, count: i64, request: PageRequest, link_base: &str) -> Self {
        let separator = if link_base.contains('?') { '&' } else { '?' };
        let link = |page: u32| format!("{link_base}{separator}page={page}&limit={}", request.limit);

        let shown_so_far = request.offset() + i64::from(request.limit);
        let next = (shown_so_far < count).then(|| link(request.page + 1));
        let previous = (request.page > 1).then(|| link(request.page - 1));

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Transform the items while keeping the navigation metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let request = PageParams::default().resolve(6);
        assert_eq!(request, PageRequest { page: 1, limit: 6 });
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_resolve_caps_limit_and_zero_page() {
        let request = PageParams {
            page: Some(0),
            limit: Some(10_000),
        }
        .resolve(6);
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_page_links() {
        let request = PageParams {
            page: Some(2),
            limit: Some(2),
        }
        .resolve(6);
        let page = Page::new(vec![3, 4], 5, request, "http://test/api/recipes?tags=lunch");

        assert_eq!(
            page.next.as_deref(),
            Some("http://test/api/recipes?tags=lunch&page=3&limit=2")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("http://test/api/recipes?tags=lunch&page=1&limit=2")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let request = PageParams {
            page: Some(3),
            limit: Some(2),
        }
        .resolve(6);
        let page = Page::new(vec![5], 5, request, "http://test/api/users");
        assert!(page.next.is_none());
        assert_eq!(
            page.previous.as_deref(),
            Some("http://test/api/users?page=2&limit=2")
        );
    }
}
