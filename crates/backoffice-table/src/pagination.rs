//! Pagination state for table views
//!
//! Pagination is either fully local (the table slices its filtered rows) or
//! fully delegated (the caller reports an authoritative total and returns
//! only the current page). The two are never mixed.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Who slices the rows into pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaginationMode {
    /// The table slices its own filtered rows
    #[default]
    Local,
    /// The caller supplies the total and returns only the current page
    Delegated,
}

impl PaginationMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Local => "Local",
            Self::Delegated => "Server",
        }
    }
}

/// A page navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNavigation {
    First,
    Prev,
    Next,
    Last,
    To(usize),
}

/// Pagination state for one table
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    /// Current page (0-indexed)
    pub page_index: usize,
    /// Rows per page, always > 0
    pub page_size: usize,
    /// Authoritative total reported by the server. Only meaningful under
    /// [`PaginationMode::Delegated`]; the table keeps it `None` otherwise.
    pub total_rows: Option<usize>,
    /// Page sizes offered by the page-size cycle buttons
    pub available_page_sizes: Vec<usize>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PaginationState {
    /// Create local pagination with the given page size (0 is treated as 1)
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
            total_rows: None,
            available_page_sizes: vec![10, 20, 30, 40, 50],
        }
    }

    pub fn with_page_sizes(mut self, sizes: Vec<usize>) -> Self {
        let mut sizes: Vec<usize> = sizes.into_iter().filter(|s| *s > 0).collect();
        sizes.sort_unstable();
        sizes.dedup();
        if !sizes.is_empty() {
            self.available_page_sizes = sizes;
        }
        self
    }

    /// Rows the page count is computed from: the server total when delegated,
    /// otherwise the local filtered length.
    pub fn effective_total(&self, local_rows: usize) -> usize {
        self.total_rows.unwrap_or(local_rows)
    }

    /// ceil(total / page_size); 0 when there are no rows
    pub fn total_pages(&self, local_rows: usize) -> usize {
        self.effective_total(local_rows).div_ceil(self.page_size)
    }

    pub fn can_go_prev(&self) -> bool {
        self.page_index > 0
    }

    /// False once the current page is the last one, including when a shrunk
    /// total leaves the current index past the end.
    pub fn can_go_next(&self, local_rows: usize) -> bool {
        self.page_index + 1 < self.total_pages(local_rows)
    }

    /// Resolve a navigation request to a page index, or `None` if it would
    /// not move. The current index is never clamped implicitly.
    pub fn target_page(&self, nav: PageNavigation, local_rows: usize) -> Option<usize> {
        let last = self.total_pages(local_rows).saturating_sub(1);
        let target = match nav {
            PageNavigation::First => 0,
            PageNavigation::Prev if self.can_go_prev() => self.page_index - 1,
            PageNavigation::Next if self.can_go_next(local_rows) => self.page_index + 1,
            PageNavigation::Last => last,
            PageNavigation::To(page) => page.min(last),
            PageNavigation::Prev | PageNavigation::Next => return None,
        };
        (target != self.page_index).then_some(target)
    }

    /// Navigate; returns the new index when the page changed
    pub fn navigate(&mut self, nav: PageNavigation, local_rows: usize) -> Option<usize> {
        let target = self.target_page(nav, local_rows)?;
        self.page_index = target;
        Some(target)
    }

    /// Set rows per page. Always resets to the first page. Returns false for
    /// a zero size or an unchanged size.
    pub fn set_page_size(&mut self, size: usize) -> bool {
        if size == 0 || size == self.page_size {
            return false;
        }
        self.page_size = size;
        self.page_index = 0;
        true
    }

    /// Next larger (or smaller) size from `available_page_sizes`
    pub fn adjacent_page_size(&self, larger: bool) -> Option<usize> {
        if larger {
            self.available_page_sizes
                .iter()
                .copied()
                .find(|s| *s > self.page_size)
        } else {
            self.available_page_sizes
                .iter()
                .rev()
                .copied()
                .find(|s| *s < self.page_size)
        }
    }

    /// Row range of the current page within a locally sliced collection
    pub fn page_range(&self, local_rows: usize) -> Range<usize> {
        let start = self.page_index.saturating_mul(self.page_size).min(local_rows);
        let end = start.saturating_add(self.page_size).min(local_rows);
        start..end
    }

    /// Status text such as "10 rows in page 1 of 3 (25 total)"
    pub fn status_text(&self, rows_in_page: usize, local_rows: usize) -> String {
        let total = self.effective_total(local_rows);
        let total_pages = self.total_pages(local_rows).max(1);
        let noun = if rows_in_page == 1 { "row" } else { "rows" };
        format!(
            "{} {} in page {} of {} ({} total)",
            rows_in_page,
            noun,
            self.page_index + 1,
            total_pages,
            total
        )
    }
}
