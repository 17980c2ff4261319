//! Pagination for list endpoints.
//!
//! Lists accept `?page=` (1-indexed) and `?limit=` (items per page). When
//! `page` is absent an explicit `offset` may be given instead. The page size
//! defaults to, and is capped at, [`MAX_PAGE_SIZE`].
//!
//! Every list answers with the same envelope:
//!
//! ```json
//! {
//!   "data": [...],
//!   "meta": { "total": 240, "limit": 100, "offset": 100, "page": 2, "has_more": true }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::serde::deserialize_optional_i64;

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    pub has_more: bool,
}

impl PaginationMeta {
    pub fn new(total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        Self {
            total,
            limit,
            offset,
            page: params.page(),
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

#[derive(Debug, Clone, Hash, Default, Deserialize)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    /// Effective page size, clamped to `[1, MAX_PAGE_SIZE]`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Rows to skip; derived from `page` when present. Saturates rather
    /// than overflowing on huge client values.
    #[must_use]
    pub fn offset(&self) -> i64 {
        match self.page {
            Some(page) => (page.max(1) - 1).saturating_mul(self.limit()),
            None => self.offset.unwrap_or(0).max(0),
        }
    }

    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}

/// A page of results plus its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, params: &PaginationParams) -> Self {
        Self {
            data,
            meta: PaginationMeta::new(total, params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, offset: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams {
            limit,
            offset,
            page,
        }
    }

    #[test]
    fn test_default_page_size_is_one_hundred() {
        let p = PaginationParams::default();
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), None);
    }

    #[test]
    fn test_limit_is_clamped() {
        for (input, expected) in [(Some(0), 1), (Some(-3), 1), (Some(25), 25), (Some(500), 100)] {
            assert_eq!(params(input, None, None).limit(), expected);
        }
    }

    #[test]
    fn test_page_takes_precedence_over_offset() {
        let p = params(Some(20), Some(7), Some(3));
        assert_eq!(p.offset(), 40);
        assert_eq!(p.page(), Some(3));
    }

    #[test]
    fn test_page_zero_is_first_page() {
        let p = params(Some(10), None, Some(0));
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), Some(1));
    }

    #[test]
    fn test_negative_offset_is_zero() {
        assert_eq!(params(None, Some(-5), None).offset(), 0);
    }

    #[test]
    fn test_meta_has_more() {
        let p = params(Some(10), None, Some(2));
        assert!(PaginationMeta::new(25, &p).has_more);
        assert!(!PaginationMeta::new(20, &p).has_more);
    }

    #[test]
    fn test_huge_page_and_offset_saturate() {
        let p = params(Some(10), None, Some(i64::MAX));
        assert_eq!(p.offset(), i64::MAX);
        assert!(!PaginationMeta::new(5, &p).has_more);

        let p = params(None, Some(i64::MAX), None);
        assert_eq!(p.offset(), i64::MAX);
        let meta = PaginationMeta::new(5, &p);
        assert_eq!(meta.offset, i64::MAX);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_query_strings_with_empty_values() {
        let p: PaginationParams = serde_json::from_str(r#"{"limit":"","page":"2"}"#).unwrap();
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 100);
    }

    #[test]
    fn test_paginated_serializes_data_and_meta() {
        let page = Paginated::new(vec![1, 2], 2, &PaginationParams::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["meta"]["total"], 2);
        assert_eq!(json["meta"]["has_more"], false);
        assert!(json["meta"].get("page").is_none());
    }
}
