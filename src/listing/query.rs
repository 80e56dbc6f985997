//! Listing query parameters
//!
//! [`ListingQuery`] is the full input of one listing derivation: filter
//! selection, free text, sort and page. It deserializes with defaults so a
//! view can restore it from a partial JSON blob.
//!
//! # Example
//! ```rust,ignore
//! let query: ListingQuery = serde_json::from_value(json!({
//!     "text": "engineer",
//!     "selection": { "facets": { "location": ["Austin"] } },
//!     "sort": "applicants:desc",
//!     "page": 2
//! }))?;
//! ```

use super::comparator::SortDirection;
use super::predicate::FilterSelection;
use serde::{Deserialize, Serialize};

/// Page size used when none is given
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Query parameters for one listing view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    /// Active facets and toggles
    pub selection: FilterSelection,

    /// Free-text query, matched case-insensitively
    pub text: String,

    /// Sort expression
    ///
    /// # Format
    /// - `key` or `key:asc` (ascending)
    /// - `key:desc` (descending)
    /// - absent: the view's default key and direction
    pub sort: Option<String>,

    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub page_size: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            selection: FilterSelection::default(),
            text: String::new(),
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_selection(mut self, selection: FilterSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_sort(mut self, key: &str, direction: SortDirection) -> Self {
        self.sort = Some(format!("{}:{}", key, direction));
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get page size; zero is raised to one, larger sizes are honored as given
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Split the sort expression into key and explicit direction
    ///
    /// An unparseable direction suffix is treated as absent.
    pub fn sort_parts(&self) -> (Option<&str>, Option<SortDirection>) {
        let Some(sort) = self.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return (None, None);
        };
        match sort.split_once(':') {
            Some((key, dir)) => (Some(key.trim()), SortDirection::parse(dir)),
            None => (Some(sort), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_defaults() {
        let query = ListingQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(query.sort_parts(), (None, None));
    }

    #[test]
    fn test_page_and_size_clamping() {
        let query = ListingQuery::new().with_page(0).with_page_size(5000);
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), 5000);
        assert_eq!(ListingQuery::new().with_page_size(0).page_size(), 1);
    }

    #[test]
    fn test_sort_parts() {
        let query = ListingQuery::new().with_sort("applicants", SortDirection::Desc);
        assert_eq!(
            query.sort_parts(),
            (Some("applicants"), Some(SortDirection::Desc))
        );

        let bare = ListingQuery {
            sort: Some("title".to_string()),
            ..ListingQuery::default()
        };
        assert_eq!(bare.sort_parts(), (Some("title"), None));

        let odd = ListingQuery {
            sort: Some("title:upwards".to_string()),
            ..ListingQuery::default()
        };
        assert_eq!(odd.sort_parts(), (Some("title"), None));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let query: ListingQuery = serde_json::from_value(json!({
            "text": "eng",
            "selection": { "facets": { "location": ["Austin"] } }
        }))
        .unwrap();

        assert_eq!(query.text, "eng");
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(query.selection.facets["location"], vec!["Austin".to_string()]);
        assert!(query.selection.toggles.is_empty());
    }
}
