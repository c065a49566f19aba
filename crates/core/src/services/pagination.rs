//! Feed pagination.
//!
//! Slices an ordered result set into fixed-size pages. Page numbers are
//! 1-based; an absent or zero page resolves to the first page and a page
//! beyond the last clamps to the last page instead of erroring. An empty
//! result set still yields exactly one (empty) page.

use serde::Serialize;

/// Default number of posts per page.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Resolved slice bounds and navigation metadata for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    /// Resolved 1-based page number.
    pub number: u64,
    /// Number of items to skip.
    pub offset: u64,
    /// Maximum number of items on the page.
    pub limit: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages (at least 1).
    pub total_pages: u64,
}

impl PageBounds {
    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Computes page bounds for a fixed page size.
#[derive(Debug, Clone)]
pub struct Paginator {
    page_size: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Paginator {
    /// Create a paginator. A zero page size is treated as 1.
    #[must_use]
    pub const fn new(page_size: u64) -> Self {
        Self {
            page_size: if page_size == 0 { 1 } else { page_size },
        }
    }

    /// The configured page size.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Resolve bounds for the requested page over `total_items` items.
    #[must_use]
    pub const fn paginate(&self, total_items: u64, requested_page: Option<u64>) -> PageBounds {
        let total_pages = {
            let pages = total_items.div_ceil(self.page_size);
            if pages == 0 { 1 } else { pages }
        };

        let requested = match requested_page {
            Some(0) | None => 1,
            Some(n) => n,
        };
        let number = if requested > total_pages {
            total_pages
        } else {
            requested
        };

        PageBounds {
            number,
            offset: self.page_size * (number - 1),
            limit: self.page_size,
            total_items,
            total_pages,
        }
    }
}

/// A bounded slice of a feed plus navigation metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-based page number.
    pub number: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages (at least 1).
    pub total_pages: u64,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Whether a previous page exists.
    pub has_previous: bool,
}

impl<T> Page<T> {
    /// Couple a fetched slice with its resolved bounds.
    #[must_use]
    pub fn new(items: Vec<T>, bounds: PageBounds) -> Self {
        Self {
            items,
            number: bounds.number,
            total_items: bounds.total_items,
            total_pages: bounds.total_pages,
            has_next: bounds.has_next(),
            has_previous: bounds.has_previous(),
        }
    }

    /// Map the items while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
        }
    }
}
