//! Client-side pagination over an in-memory collection

/// Bounds of one page. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Page these bounds were computed for
    pub page: usize,
    /// Index of the first visible element
    pub first_index: usize,
    /// One past the last visible element
    pub last_index_exclusive: usize,
    /// Number of pages; 0 for an empty collection
    pub page_count: usize,
}

impl PageWindow {
    /// Number of visible elements
    pub fn len(&self) -> usize {
        self.last_index_exclusive - self.first_index
    }

    /// Whether the page shows nothing
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visible part of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.last_index_exclusive.min(items.len());
        let start = self.first_index.min(end);
        &items[start..end]
    }
}

/// Number of pages needed for `len` items
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// The page actually shown when `page` is requested: `1..=max(1, page_count)`
pub fn clamp_page(len: usize, page_size: usize, page: usize) -> usize {
    page.clamp(1, page_count(len, page_size).max(1))
}

/// Compute the window for `page` (clamped) over a collection of `len` items
pub fn paginate(len: usize, page_size: usize, page: usize) -> PageWindow {
    let page_size = page_size.max(1);
    let page = clamp_page(len, page_size, page);
    let first_index = ((page - 1) * page_size).min(len);

    PageWindow {
        page,
        first_index,
        last_index_exclusive: (page * page_size).min(len),
        page_count: page_count(len, page_size),
    }
}

/// Current page of a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    page: usize,
}

impl Paginator {
    /// Create a paginator positioned on page 1
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
        }
    }

    /// Items per page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page
    pub fn page(&self) -> usize {
        self.page
    }

    /// Move to `page`, clamped against a collection of `len` items
    pub fn set_page(&mut self, page: usize, len: usize) {
        self.page = clamp_page(len, self.page_size, page);
    }

    /// Re-clamp after the collection changed size
    pub fn clamp(&mut self, len: usize) {
        self.set_page(self.page, len);
    }

    /// Window for the current page
    pub fn window(&self, len: usize) -> PageWindow {
        paginate(len, self.page_size, self.page)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
    }

    #[test]
    fn test_window_bounds() {
        let w = paginate(25, 10, 3);
        assert_eq!((w.first_index, w.last_index_exclusive, w.page_count), (20, 25, 3));
        assert_eq!(w.len(), 5);

        let empty = paginate(0, 10, 1);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.page_count, 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_page_is_clamped() {
        assert_eq!(paginate(11, 10, 7).page, 2);
        assert_eq!(paginate(11, 10, 0).page, 1);
        assert_eq!(clamp_page(0, 10, 4), 1);
    }

    #[test]
    fn test_pages_reconstruct_collection() {
        for len in [0usize, 1, 9, 10, 11, 37] {
            for k in [1usize, 3, 10] {
                let items: Vec<usize> = (0..len).collect();
                let count = page_count(len, k);
                let mut joined = Vec::new();
                for p in 1..=count {
                    let w = paginate(len, k, p);
                    let expected = k.min(len.saturating_sub(k * (p - 1)));
                    assert_eq!(w.slice(&items).len(), expected);
                    joined.extend_from_slice(w.slice(&items));
                }
                assert_eq!(joined, items);
            }
        }
    }

    #[test]
    fn test_paginator_clamps_after_shrink() {
        let mut paginator = Paginator::new(10);
        paginator.set_page(2, 11);
        assert_eq!(paginator.page(), 2);
        paginator.clamp(10);
        assert_eq!(paginator.page(), 1);
    }
}
