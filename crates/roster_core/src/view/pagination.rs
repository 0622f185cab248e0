//! Fixed-size page slicing over the visible list.
//!
//! # Invariants
//! - Page numbers are 1-based.
//! - `total_pages` is at least 1, even for an empty list.
//! - Navigation clamps to `[1, total_pages]`.

/// Page size used when none (or zero) is configured.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One page window over a borrowed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number actually shown, after clamping.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Normalizes a configured page size; `0` falls back to the default.
pub fn normalize_page_size(page_size: usize) -> usize {
    if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    }
}

/// `ceil(total / page_size)`, floored at 1.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(normalize_page_size(page_size)).max(1)
}

/// Clamps `page` into `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slices `items[(page-1)*size .. page*size]`, clamping `page` first.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let page_size = normalize_page_size(page_size);
    let total_pages = total_pages(items.len(), page_size);
    let page = clamp_page(page, total_pages);
    let start = ((page - 1) * page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    Page {
        items: &items[start..end],
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// Current-page cursor with clamped navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    page: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: normalize_page_size(page_size),
            page: 1,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Back to page 1; called whenever the upstream list changes.
    pub fn reset(&mut self) {
        self.page = 1;
    }

    pub fn next(&mut self, total_items: usize) -> usize {
        self.go_to(self.page.saturating_add(1), total_items)
    }

    pub fn prev(&mut self) -> usize {
        self.page = self.page.saturating_sub(1).max(1);
        self.page
    }

    pub fn go_to(&mut self, page: usize, total_items: usize) -> usize {
        self.page = clamp_page(page, total_pages(total_items, self.page_size));
        self.page
    }

    /// Slices `items` at the current page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> Page<'a, T> {
        paginate(items, self.page_size, self.page)
    }
}
