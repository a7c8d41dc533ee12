//! Pagination arithmetic for product listings

use super::{QueryParams, ValidationError};

/// Maximum items per page
const MAX_PAGE_SIZE: u32 = 100;

/// Default items per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page (max 100)
    pub page_size: u32,
}

impl Pagination {
    /// Create pagination with validation.
    ///
    /// - Page is clamped to minimum of 1
    /// - Page size is clamped to 1..=100
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Read `page` and `pageSize` from the URL, falling back to defaults when
    /// absent. Present but non-numeric values are rejected.
    pub fn from_query(params: &QueryParams, default_page_size: u32) -> Result<Self, ValidationError> {
        let page = parse_u32(params.get("page"), "page")?.unwrap_or(1);
        let page_size = parse_u32(params.get("pageSize"), "pageSize")?.unwrap_or(default_page_size);
        Ok(Self::new(page, page_size))
    }

    /// Calculate SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> u32 {
        self.page_size
    }

    /// Last page number for `count` results at this page size.
    pub fn last_page(&self, count: i64) -> u32 {
        last_page(count, self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// `ceil(count / page_size)`; zero results means zero pages.
///
/// A zero page size yields zero rather than dividing by zero.
pub fn last_page(count: i64, page_size: u32) -> u32 {
    if count <= 0 || page_size == 0 {
        return 0;
    }
    let count = count as u64;
    let page_size = page_size as u64;
    count.div_ceil(page_size).min(u32::MAX as u64) as u32
}

fn parse_u32(value: Option<&str>, field: &'static str) -> Result<Option<u32>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse::<u32>().map(Some).map_err(|_| ValidationError::InvalidFormat {
            field,
            reason: "must be a non-negative integer",
        }),
    }
}
