//! Pagination math, kept separate from the query layer so the boundary
//! behavior is testable without a database.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Derived pagination metadata returned alongside every page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMetadata {
    pub current_page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl PaginationMetadata {
    /// Compute metadata for a page request.
    ///
    /// `total_pages` is zero for an empty result set, and `has_previous` is
    /// computed literally from the requested page even when that page is
    /// necessarily empty. Callers guarantee `page >= 1` and `page_size >= 1`.
    pub fn compute(total_items: u64, page: u64, page_size: u64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            total_items.div_ceil(page_size)
        };

        Self {
            current_page: page,
            page_size,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_set_has_zero_pages() {
        let meta = PaginationMetadata::compute(0, 1, 10);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_previous);
    }

    #[test]
    fn empty_result_set_on_later_page_still_reports_previous() {
        // page > 1 against zero items: has_previous is computed literally.
        let meta = PaginationMetadata::compute(0, 3, 10);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(meta.has_previous);
    }

    #[test]
    fn exact_multiple_of_page_size() {
        let meta = PaginationMetadata::compute(20, 1, 10);
        assert_eq!(meta.total_pages, 2);
        assert!(meta.has_next);
        assert!(!meta.has_previous);
    }

    #[test]
    fn remainder_rounds_up() {
        let meta = PaginationMetadata::compute(21, 2, 10);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_previous);
    }

    #[test]
    fn last_page_has_no_next() {
        let meta = PaginationMetadata::compute(21, 3, 10);
        assert!(!meta.has_next);
        assert!(meta.has_previous);
    }

    #[test]
    fn page_beyond_total_pages() {
        let meta = PaginationMetadata::compute(5, 4, 10);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_next);
        assert!(meta.has_previous);
    }

    #[test]
    fn page_size_one() {
        let meta = PaginationMetadata::compute(3, 2, 1);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_previous);
    }
}
