//! Pagination over a filtered, sorted result.

use serde::Serialize;

/// One page of rows plus the metadata a list footer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// Page number, starting at 1.
    pub page: usize,
    /// Page size.
    pub limit: usize,
    /// Number of rows across all pages.
    pub total: usize,
    /// Number of pages; 0 when there are no rows.
    pub total_pages: usize,
    /// Whether a later page has rows.
    pub has_next: bool,
    /// Whether this is not the first page.
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// Rows on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maps every row, keeping the page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// Cuts page `page` (1-based) of size `limit` out of `rows`.
///
/// Both arguments are clamped to at least 1. A page past the end is empty
/// but still reports the totals.
///
/// ```
/// use marquee_query::paginate;
///
/// let rows: Vec<u32> = (1..=23).collect();
/// let page = paginate(&rows, 3, 10);
/// assert_eq!(page.items, [21, 22, 23]);
/// assert_eq!(page.total_pages, 3);
/// assert!(!page.has_next);
/// ```
pub fn paginate<T: Clone>(rows: &[T], page: usize, limit: usize) -> Page<T> {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = rows.len();
    let total_pages = total.div_ceil(limit);
    let start = (page - 1).saturating_mul(limit);

    let items = rows.iter().skip(start).take(limit).cloned().collect();

    Page {
        items,
        page,
        limit,
        total,
        total_pages,
        has_next: start.saturating_add(limit) < total,
        has_prev: page > 1,
    }
}
