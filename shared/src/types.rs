//! Common types used across the tracker

use serde::{Deserialize, Serialize};

/// Varieties shown per dashboard page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Most page links shown by the pagination control
pub const PAGE_WINDOW_SIZE: usize = 5;

/// One page of a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
}

/// Number of pages needed for `total_items`; zero for an empty list
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Slice `records` into page `page_number` (1-based) of `page_size` items.
///
/// Pages past the end, page 0, and a zero page size all give an empty page.
pub fn paginate<T: Clone>(records: &[T], page_size: usize, page_number: usize) -> Page<T> {
    let total_pages = total_pages(records.len(), page_size);

    let items = if page_number == 0 || page_number > total_pages {
        Vec::new()
    } else {
        let start = (page_number - 1) * page_size;
        let end = (start + page_size).min(records.len());
        records[start..end].to_vec()
    };

    Page { items, total_pages }
}

/// Page numbers for the pagination control: up to five links around the
/// current page, shifted to stay within `1..=total_pages`.
pub fn page_window(current_page: usize, total_pages: usize) -> Vec<usize> {
    if total_pages <= PAGE_WINDOW_SIZE {
        return (1..=total_pages).collect();
    }

    let half = PAGE_WINDOW_SIZE / 2;
    let first = if current_page <= half + 1 {
        1
    } else if current_page + half >= total_pages {
        total_pages - PAGE_WINDOW_SIZE + 1
    } else {
        current_page - half
    };

    (first..first + PAGE_WINDOW_SIZE).collect()
}
