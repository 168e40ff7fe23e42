use std::ops::Range;

use crate::core::PaginationState;

/// One page of an ordered sequence: the slice bounds plus navigation flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    pub range: Range<usize>,
    pub page_count: usize,
    pub can_go_next: bool,
    pub can_go_previous: bool,
}

/// Service for pagination operations
pub struct PaginationService;

impl PaginationService {
    /// `ceil(len / page_size)`; 0 for an empty sequence. A zero page size yields 0.
    pub fn page_count(len: usize, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        len.div_ceil(page_size)
    }

    /// Constrain a page index into `[0, page_count - 1]`, or 0 when there are no pages.
    pub fn clamp_page_index(page_index: usize, page_count: usize) -> usize {
        page_index.min(page_count.saturating_sub(1))
    }

    /// Window over a sequence of `len` items. Out-of-range pages give an empty range.
    pub fn paginate(len: usize, pagination: &PaginationState) -> PageWindow {
        let page_count = Self::page_count(len, pagination.page_size);
        let start = pagination
            .page_index
            .saturating_mul(pagination.page_size)
            .min(len);
        let end = start.saturating_add(pagination.page_size).min(len);
        PageWindow {
            range: start..end,
            page_count,
            can_go_next: pagination.page_index < page_count.saturating_sub(1),
            can_go_previous: pagination.page_index > 0,
        }
    }

    /// Slice `items` down to the current page.
    pub fn page<'a, T>(items: &'a [T], pagination: &PaginationState) -> (&'a [T], PageWindow) {
        let window = Self::paginate(items.len(), pagination);
        (&items[window.range.clone()], window)
    }
}
