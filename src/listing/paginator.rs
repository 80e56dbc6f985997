//! Page arithmetic
//!
//! Pages are 1-based and there is always at least one page, even for an
//! empty view, so a clamped page index is always valid.

use serde::Serialize;

/// Number of pages needed for `total_items`: `max(1, ceil(total / page_size))`
///
/// A zero page size is treated as 1.
pub fn page_count(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Clamp any requested page (including 0 or negative) into `[1, page_count]`
pub fn clamp(requested: i64, page_count: usize) -> usize {
    let upper = page_count.max(1);
    if requested < 1 {
        1
    } else {
        usize::try_from(requested).map_or(upper, |page| page.min(upper))
    }
}

/// Items of `page` in `view`: `view[(page-1)*size .. page*size]`
///
/// Pages outside the view (including page 0) yield an empty slice.
pub fn slice<T>(view: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= view.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(view.len());
    &view[start..end]
}

/// One entry of a pagination control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageLink {
    Page(usize),
    Gap,
}

/// Windowed page list: first, last, and `radius` pages around `current`
///
/// Runs of skipped pages collapse into a single [`PageLink::Gap`]; a gap
/// that would hide exactly one page shows that page instead.
pub fn page_window(current: usize, page_count: usize, radius: usize) -> Vec<PageLink> {
    let last = page_count.max(1);
    let current = current.clamp(1, last);
    let low = current.saturating_sub(radius).max(1);
    let high = current.saturating_add(radius).min(last);

    let mut pages = vec![1];
    pages.extend(low..=high);
    pages.push(last);
    pages.sort_unstable();
    pages.dedup();

    let mut links = Vec::with_capacity(pages.len() + 2);
    let mut previous = 0;
    for page in pages {
        match page - previous {
            1 => {}
            2 => links.push(PageLink::Page(previous + 1)),
            _ if previous > 0 => links.push(PageLink::Gap),
            _ => {}
        }
        links.push(PageLink::Page(page));
        previous = page;
    }
    links
}

/// Pagination metadata for a derived page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Total number of items (after filters)
    pub total: usize,

    /// Total number of pages (at least 1)
    pub total_pages: usize,

    pub has_next: bool,

    pub has_prev: bool,
}

impl PaginationMeta {
    /// Build metadata, clamping `page` into range
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = page_count(total, page_size);
        let page = clamp(i64::try_from(page).unwrap_or(i64::MAX), total_pages);

        Self {
            page,
            page_size,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 6), 1);
        assert_eq!(page_count(6, 6), 1);
        assert_eq!(page_count(7, 6), 2);
        assert_eq!(page_count(13, 6), 3);
        assert_eq!(page_count(5, 0), 5);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(0, 3), 1);
        assert_eq!(clamp(-4, 3), 1);
        assert_eq!(clamp(2, 3), 2);
        assert_eq!(clamp(5, 3), 3);
        assert_eq!(clamp(i64::MAX, 3), 3);
        assert_eq!(clamp(7, 0), 1);
    }

    #[test]
    fn test_slice_bounds() {
        let view: Vec<u32> = (1..=13).collect();
        assert_eq!(slice(&view, 1, 6), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(slice(&view, 3, 6), &[13]);
        assert!(slice(&view, 4, 6).is_empty());
        assert!(slice(&view, 0, 6).is_empty());
        assert!(slice::<u32>(&[], 1, 6).is_empty());
    }

    #[test]
    fn test_page_window_small_count_has_no_gaps() {
        let links = page_window(2, 4, 1);
        assert_eq!(
            links,
            vec![
                PageLink::Page(1),
                PageLink::Page(2),
                PageLink::Page(3),
                PageLink::Page(4)
            ]
        );
    }

    #[test]
    fn test_page_window_collapses_runs() {
        let links = page_window(10, 20, 1);
        assert_eq!(
            links,
            vec![
                PageLink::Page(1),
                PageLink::Gap,
                PageLink::Page(9),
                PageLink::Page(10),
                PageLink::Page(11),
                PageLink::Gap,
                PageLink::Page(20)
            ]
        );
    }

    #[test]
    fn test_page_window_single_hidden_page_is_shown() {
        let links = page_window(4, 8, 1);
        assert_eq!(links[0], PageLink::Page(1));
        assert_eq!(links[1], PageLink::Page(2));
        assert_eq!(links[2], PageLink::Page(3));
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);

        let clamped = PaginationMeta::new(9, 20, 145);
        assert_eq!(clamped.page, 8);
        assert!(!clamped.has_next);

        let empty = PaginationMeta::new(1, 10, 0);
        assert_eq!(empty.total_pages, 1);
        assert!(!empty.has_next);
    }
}
