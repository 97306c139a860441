//! Page-range arithmetic.
//!
//! List endpoints fetch the total count first and check the requested page
//! against it, so storage is never asked for a page past the end.

use thiserror::Error;

/// Pagination validation failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PaginationError {
    /// `page` was below 1.
    #[error("page value cannot be less than 1")]
    PageTooSmall,

    /// `pageSize` was below 1.
    #[error("pageSize value cannot be less than 1")]
    PageSizeTooSmall,

    /// `page` lies past the last page.
    #[error("page number {page} is bigger than max page {max_page}")]
    PageOutOfRange {
        /// Requested page
        page: i32,
        /// Last available page
        max_page: i32,
    },
}

/// Number of pages needed to hold `count` records at `page_size` per page.
///
/// Returns 0 for an empty collection. `page_size` must be positive; values
/// below 1 are treated as 1.
#[must_use]
pub fn max_page(count: i64, page_size: i32) -> i32 {
    let page_size = i64::from(page_size.max(1));
    let pages = (count.max(0) + page_size - 1) / page_size;
    i32::try_from(pages).unwrap_or(i32::MAX)
}

/// A validated `(page, pageSize)` pair, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i32,
    page_size: i32,
}

impl Pagination {
    /// Validate a requested page and page size.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::PageTooSmall`] or
    /// [`PaginationError::PageSizeTooSmall`] for values below 1.
    pub const fn new(page: i32, page_size: i32) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::PageTooSmall);
        }
        if page_size < 1 {
            return Err(PaginationError::PageSizeTooSmall);
        }
        Ok(Self { page, page_size })
    }

    /// Requested page (1-based).
    #[must_use]
    pub const fn page(&self) -> i32 {
        self.page
    }

    /// Records per page.
    #[must_use]
    pub const fn page_size(&self) -> i32 {
        self.page_size
    }

    /// Compute the page count for `count` records and check that the
    /// requested page is within it.
    ///
    /// An empty collection has a page count of 0 and accepts any page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::PageOutOfRange`] if the collection is
    /// non-empty and the requested page lies past the last one.
    pub fn max_page_for(&self, count: i64) -> Result<i32, PaginationError> {
        let max_page = max_page(count, self.page_size);
        if max_page != 0 && self.page > max_page {
            return Err(PaginationError::PageOutOfRange {
                page: self.page,
                max_page,
            });
        }
        Ok(max_page)
    }
}
