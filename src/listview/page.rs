//! Pagination bookkeeping.

use crate::domain::{Result, RosterError};
use serde::Serialize;
use std::num::NonZeroUsize;

/// Pagination metadata handed to the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    /// 1-based current page.
    pub current_page: usize,
    /// `ceil(total_count / page_size)`; zero when nothing matches.
    pub total_pages: usize,
    /// Number of records in the derived set.
    pub total_count: usize,
}

impl PaginationInfo {
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Current page, fixed page size and derived page count.
///
/// Invariant: `1 <= current <= max(1, total_pages)` after every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current: usize,
    size: NonZeroUsize,
    total_pages: usize,
}

impl PageState {
    /// # Errors
    ///
    /// Returns [`RosterError::Config`] when `page_size` is zero.
    pub fn new(page_size: usize) -> Result<Self> {
        let size = NonZeroUsize::new(page_size)
            .ok_or_else(|| RosterError::Config("page size must be a positive integer".to_string()))?;
        Ok(Self {
            current: 1,
            size,
            total_pages: 0,
        })
    }

    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size.get()
    }

    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }

    const fn last_page(&self) -> usize {
        if self.total_pages == 0 {
            1
        } else {
            self.total_pages
        }
    }

    /// Recomputes the page count for `total_count` records and clamps.
    pub fn update_total(&mut self, total_count: usize) {
        self.total_pages = total_count.div_ceil(self.size.get());
        self.current = self.current.clamp(1, self.last_page());
    }

    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Moves to `page`, clamped into range.
    pub fn go_to(&mut self, page: usize) {
        self.current = page.clamp(1, self.last_page());
    }

    /// Returns `false` when already on the last page.
    pub fn next(&mut self) -> bool {
        if self.current < self.total_pages {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Returns `false` when already on the first page.
    pub fn prev(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Index range of the current page within a set of `len` records.
    #[must_use]
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = (self.current - 1).saturating_mul(self.size.get()).min(len);
        let end = start.saturating_add(self.size.get()).min(len);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn zero_page_size_is_a_config_error() {
        assert!(matches!(PageState::new(0), Err(RosterError::Config(_))));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(25, 3)]
    fn total_pages_is_ceiling(#[case] count: usize, #[case] pages: usize) {
        let mut page = PageState::new(10).unwrap();
        page.update_total(count);
        assert_eq!(page.total_pages(), pages);
        assert_eq!(page.current(), 1);
    }

    #[test]
    fn shrinking_total_clamps_current() {
        let mut page = PageState::new(10).unwrap();
        page.update_total(30);
        page.go_to(3);
        assert_eq!(page.current(), 3);

        page.update_total(12);
        assert_eq!(page.current(), 2);

        page.update_total(0);
        assert_eq!(page.current(), 1);
    }

    #[test]
    fn navigation_stops_at_bounds() {
        let mut page = PageState::new(10).unwrap();
        page.update_total(20);
        assert!(!page.prev());
        assert!(page.next());
        assert!(!page.next());
        assert_eq!(page.current(), 2);
    }

    #[test]
    fn window_of_last_partial_page() {
        let mut page = PageState::new(10).unwrap();
        page.update_total(25);
        page.go_to(3);
        assert_eq!(page.window(25), 20..25);
        assert_eq!(page.window(0), 0..0);
    }
}
