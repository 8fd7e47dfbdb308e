// src/content/paginate.rs
//! Fixed-size page slicing plus the caller-side page state.

use serde::Serialize;

use crate::content::filter::CategoryFilter;

pub const DEFAULT_PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Slice one 1-based page out of `items`.
///
/// Page numbers are not clamped: anything below 1 or past the last page yields
/// an empty `items` slice with the totals still filled in.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let total_items = items.len();
    if page_size == 0 {
        return Page {
            items: Vec::new(),
            total_items,
            total_pages: 0,
        };
    }
    let total_pages = total_items.div_ceil(page_size);
    let slice: &[T] = match page.checked_sub(1) {
        Some(idx) => {
            let start = idx.saturating_mul(page_size).min(total_items);
            let end = start.saturating_add(page_size).min(total_items);
            &items[start..end]
        }
        None => &[],
    };
    Page {
        items: slice.to_vec(),
        total_items,
        total_pages,
    }
}

/// Clamp a requested page into `1..=total_pages` (1 when there are no pages).
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Search, category and page requested by one list view.
///
/// Changing the search text or the category always resets the page to 1 so a
/// narrower result set is never viewed from a page that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    search: String,
    category: CategoryFilter,
    page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: CategoryFilter::All,
            page: 1,
        }
    }
}

impl PageState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if search != self.search {
            self.search = search;
            self.page = 1;
        }
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        if category != self.category {
            self.category = category;
            self.page = 1;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Pull the page back into range after the result set changed size.
    pub fn clamp_to(&mut self, total_pages: usize) {
        self.page = clamp_page(self.page, total_pages);
    }
}
