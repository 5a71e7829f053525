//! Page-number pagination shared by every list endpoint and page.

use serde::{Deserialize, Serialize};

/// Largest page size any list endpoint will serve.
pub const MAX_LIMIT: u32 = 100;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Parse raw query values leniently.
    ///
    /// A missing, non-numeric or zero page becomes 1. A missing or invalid
    /// limit becomes `default_limit`; any limit is clamped to `1..=100`.
    #[must_use]
    pub fn parse(page: Option<&str>, limit: Option<&str>, default_limit: u32) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<u32>().ok())
            .unwrap_or(default_limit)
            .clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    /// Row offset for SQL `OFFSET`.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    /// Limit as the integer type SQL `LIMIT` binds.
    #[must_use]
    pub const fn sql_limit(&self) -> i64 {
        self.limit as i64
    }
}

/// Pagination metadata returned next to every list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl PageMeta {
    #[must_use]
    pub fn new(total: u64, request: PageRequest) -> Self {
        let limit = u64::from(request.limit.max(1));
        let total_pages = u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX);
        Self {
            total,
            page: request.page,
            limit: request.limit,
            total_pages,
        }
    }

    /// Metadata for a listing that could not be loaded.
    #[must_use]
    pub const fn empty(limit: u32) -> Self {
        Self {
            total: 0,
            page: 1,
            limit,
            total_pages: 0,
        }
    }

    /// Previous page number, never below 1.
    #[must_use]
    pub const fn previous(&self) -> u32 {
        if self.page > 1 { self.page - 1 } else { 1 }
    }

    /// Next page number, never above the last page.
    #[must_use]
    pub fn next(&self) -> u32 {
        self.page.saturating_add(1).min(self.total_pages.max(1))
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether pagination controls should be rendered at all.
    #[must_use]
    pub const fn show_controls(&self) -> bool {
        self.total_pages > 1
    }
}

/// List envelope: `{ "data": [...], "meta": {...} }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            data,
            meta: PageMeta::new(total, request),
        }
    }

    #[must_use]
    pub const fn empty(limit: u32) -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta::empty(limit),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let req = PageRequest::parse(None, None, 24);
        assert_eq!(req, PageRequest { page: 1, limit: 24 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!(PageRequest::parse(Some("abc"), None, 20).page, 1);
        assert_eq!(PageRequest::parse(Some("0"), None, 20).page, 1);
        assert_eq!(PageRequest::parse(Some("-3"), None, 20).page, 1);
        assert_eq!(PageRequest::parse(Some(" 4 "), None, 20).page, 4);
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(PageRequest::parse(None, Some("0"), 20).limit, 1);
        assert_eq!(PageRequest::parse(None, Some("5000"), 20).limit, 100);
        assert_eq!(PageRequest::parse(None, Some("junk"), 20).limit, 20);
    }

    #[test]
    fn test_offset() {
        let req = PageRequest::parse(Some("3"), Some("20"), 20);
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let meta = PageMeta::new(41, PageRequest { page: 1, limit: 20 });
        assert_eq!(meta.total_pages, 3);
        let meta = PageMeta::new(40, PageRequest { page: 1, limit: 20 });
        assert_eq!(meta.total_pages, 2);
        let meta = PageMeta::new(0, PageRequest { page: 1, limit: 20 });
        assert_eq!(meta.total_pages, 0);
    }

    #[test]
    fn test_previous_and_next_are_clamped() {
        let first = PageMeta::new(50, PageRequest { page: 1, limit: 20 });
        assert_eq!(first.previous(), 1);
        assert_eq!(first.next(), 2);
        assert!(!first.has_previous());
        assert!(first.has_next());

        let last = PageMeta::new(50, PageRequest { page: 3, limit: 20 });
        assert_eq!(last.previous(), 2);
        assert_eq!(last.next(), 3);
        assert!(!last.has_next());
    }

    #[test]
    fn test_controls_hidden_for_single_page() {
        assert!(!PageMeta::new(20, PageRequest { page: 1, limit: 20 }).show_controls());
        assert!(PageMeta::new(21, PageRequest { page: 1, limit: 20 }).show_controls());
        assert!(!PageMeta::empty(24).show_controls());
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let json = serde_json::to_value(PageMeta::empty(24)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"total": 0, "page": 1, "limit": 24, "totalPages": 0})
        );
    }
}
