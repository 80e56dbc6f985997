//! Filter, search, sort and page one record collection
//!
//! A [`ListingEngine`] is built once per view and holds everything that does
//! not change between keystrokes: facet accessors, searchable fields, sort
//! keys. Each call re-derives the whole view from the records it is handed;
//! there is no caching, and the input slice is never reordered.

use super::comparator::{ComparatorRegistry, SortDirection};
use super::paginator;
use super::predicate::{FilterSelection, PredicateSet};
use super::query::ListingQuery;
use super::search::{SearchField, matches_query};
use crate::core::Record;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// The visible page of a derived view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPage<T> {
    /// Records on the current page, in sorted order
    pub items: Vec<T>,

    /// Records matching the filters and text query
    pub total_count: usize,

    /// Records in the collection before any filtering
    pub unfiltered_count: usize,

    /// Number of pages (at least 1)
    pub page_count: usize,

    /// The clamped page actually shown
    pub current_page: usize,

    pub page_size: usize,

    /// Sort key applied, if the engine has any
    pub sort_key: Option<String>,

    pub direction: SortDirection,
}

impl<T> ListingPage<T> {
    /// The collection itself is empty ("no jobs posted yet")
    pub fn is_empty_collection(&self) -> bool {
        self.unfiltered_count == 0
    }

    /// Records exist but none match ("no jobs match your filters")
    pub fn is_filtered_out(&self) -> bool {
        self.unfiltered_count > 0 && self.total_count == 0
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Apply `f` to every item, keeping the page metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> ListingPage<U> {
        ListingPage {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            unfiltered_count: self.unfiltered_count,
            page_count: self.page_count,
            current_page: self.current_page,
            page_size: self.page_size,
            sort_key: self.sort_key,
            direction: self.direction,
        }
    }
}

/// Reusable filter/search/sort/paginate pipeline for one record type
pub struct ListingEngine<T> {
    name: String,
    predicates: PredicateSet<T>,
    search_fields: Vec<SearchField<T>>,
    comparators: ComparatorRegistry<T>,
    default_direction: SortDirection,
}

impl<T: Record> ListingEngine<T> {
    /// Create an engine with no predicates, no searchable fields and no sort keys
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            predicates: PredicateSet::new(),
            search_fields: Vec::new(),
            comparators: ComparatorRegistry::new(),
            default_direction: SortDirection::Asc,
        }
    }

    pub fn with_predicates(mut self, predicates: PredicateSet<T>) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn with_search_fields(mut self, fields: Vec<SearchField<T>>) -> Self {
        self.search_fields = fields;
        self
    }

    pub fn with_comparators(mut self, comparators: ComparatorRegistry<T>) -> Self {
        self.comparators = comparators;
        self
    }

    /// Direction used when the query's sort expression gives none
    pub fn with_default_direction(mut self, direction: SortDirection) -> Self {
        self.default_direction = direction;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn predicates(&self) -> &PredicateSet<T> {
        &self.predicates
    }

    pub fn comparators(&self) -> &ComparatorRegistry<T> {
        &self.comparators
    }

    pub fn search_fields(&self) -> &[SearchField<T>] {
        &self.search_fields
    }

    /// Whether `record` passes both the predicates and the text query
    pub fn matches(&self, record: &T, selection: &FilterSelection, text: &str) -> bool {
        self.predicates.matches(record, selection)
            && matches_query(record, text, &self.search_fields)
    }

    /// Filtered and sorted copy of `records`
    ///
    /// `sort_key` falls back to the registry default when absent or unknown.
    /// The sort is stable, so ties keep their collection order.
    pub fn derive(
        &self,
        records: &[T],
        selection: &FilterSelection,
        text: &str,
        sort_key: Option<&str>,
        direction: SortDirection,
    ) -> Vec<T> {
        let unknown = self.predicates.unknown_toggles(selection);
        if !unknown.is_empty() {
            warn!(listing = %self.name, toggles = ?unknown, "ignoring unknown filter toggles");
        }
        if let Some(requested) = sort_key {
            if !self.comparators.contains(requested) {
                warn!(
                    listing = %self.name,
                    sort_key = requested,
                    "unknown sort key, using default"
                );
            }
        }

        let mut survivors: Vec<&T> = records
            .iter()
            .filter(|record| self.matches(record, selection, text))
            .collect();

        if let Some(key) = self.comparators.resolve_key(sort_key) {
            survivors.sort_by(|a, b| self.comparators.compare_directed(a, b, key, direction));
        }

        debug!(
            listing = %self.name,
            input = records.len(),
            matched = survivors.len(),
            "derived listing view"
        );

        survivors.into_iter().cloned().collect()
    }

    /// Key and direction a query resolves to for this engine
    pub fn resolve_sort<'a>(&'a self, query: &'a ListingQuery) -> (Option<&'a str>, SortDirection) {
        let (key, direction) = query.sort_parts();
        (
            self.comparators.resolve_key(key),
            direction.unwrap_or(self.default_direction),
        )
    }

    /// Full derived view for `query` (every page)
    pub fn derive_view(&self, records: &[T], query: &ListingQuery) -> Vec<T> {
        let (key, direction) = self.resolve_sort(query);
        self.derive(records, &query.selection, &query.text, key, direction)
    }

    /// The clamped, paged result for `query`
    pub fn run(&self, records: &[T], query: &ListingQuery) -> ListingPage<T> {
        let (key, direction) = self.resolve_sort(query);
        let view = self.derive(records, &query.selection, &query.text, key, direction);

        let page_size = query.page_size();
        let page_count = paginator::page_count(view.len(), page_size);
        let requested = i64::try_from(query.page()).unwrap_or(i64::MAX);
        let current_page = paginator::clamp(requested, page_count);
        let items = paginator::slice(&view, current_page, page_size).to_vec();

        ListingPage {
            items,
            total_count: view.len(),
            unfiltered_count: records.len(),
            page_count,
            current_page,
            page_size,
            sort_key: key.map(String::from),
            direction,
        }
    }
}

impl<T> fmt::Debug for ListingEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListingEngine")
            .field("name", &self.name)
            .field("predicates", &self.predicates)
            .field("search_fields", &self.search_fields)
            .field("comparators", &self.comparators)
            .field("default_direction", &self.default_direction)
            .finish()
    }
}
