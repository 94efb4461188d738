//! Offset pagination and sort-order normalization
//!
//! Windowing is applied after sort: skip `(page - 1) * limit`, take
//! `limit`. Invalid or non-positive `page`/`limit` values fall back to the
//! defaults instead of erroring, matching the lenient query-string contract
//! of the public API.

use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Caller-supplied window, already coerced to sane values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageParams {
    /// Build from raw query-string values. Unparseable or non-positive
    /// input falls back to the defaults; oversized limits are capped.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.parse::<i64>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(|l| l.parse::<i64>().ok())
            .filter(|l| *l > 0)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        Self { page, limit }
    }

    /// Convenience over the query-map extractor handlers use.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        Self::from_raw(
            query.get("page").map(String::as_str),
            query.get("limit").map(String::as_str),
        )
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Sort order resolved from the caller's `sort_direction` parameter.
/// Exactly the string `"descending"` maps to descending; anything else,
/// including an absent parameter, is ascending. Existing clients depend on
/// this two-way mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("descending") => Self::Descending,
            _ => Self::Ascending,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Paginated response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub limit: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, params: PageParams, total_items: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + params.limit - 1) / params.limit
        };
        Self {
            items,
            page: params.page,
            limit: params.limit,
            total_items,
            total_pages,
        }
    }
}
