//! Pagination types

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 20;
/// Hard cap on page size
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page request query parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct PageRequest {
    /// 1-based page number
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageRequest {
    /// Effective 1-based page number
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size, clamped to [1, MAX_PAGE_SIZE]
    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// SQL OFFSET for this page
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.page_size()
    }
}

/// A single page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_defaults_and_clamping() {
        let req = PageRequest::default();
        assert_eq!(req.page(), 1);
        assert_eq!(req.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(req.offset(), 0);

        let req = PageRequest {
            page: Some(0),
            page_size: Some(10_000),
        };
        assert_eq!(req.page(), 1);
        assert_eq!(req.page_size(), MAX_PAGE_SIZE);

        let req = PageRequest {
            page: Some(3),
            page_size: Some(25),
        };
        assert_eq!(req.offset(), 50);
    }
}
