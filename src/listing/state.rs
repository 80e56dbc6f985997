//! Per-view query state
//!
//! A view owns one [`ListingState`]. Mutators mirror UI actions; narrowing or
//! widening the result set sends the view back to page 1, and every
//! [`ListingState::view`] call writes the clamped page back so the stored
//! index can never dangle past the last page.

use super::comparator::SortDirection;
use super::pipeline::{ListingEngine, ListingPage};
use super::query::ListingQuery;
use crate::core::Record;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingState {
    query: ListingQuery,
}

impl ListingState {
    pub fn new(page_size: usize) -> Self {
        Self {
            query: ListingQuery::new().with_page_size(page_size),
        }
    }

    pub fn from_query(query: ListingQuery) -> Self {
        Self { query }
    }

    pub fn query(&self) -> &ListingQuery {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.query.page()
    }

    /// Replace the free-text query; returns whether it changed
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.query.text == text {
            return false;
        }
        self.query.text = text.to_string();
        self.query.page = 1;
        true
    }

    /// Checkbox click on a facet value; returns whether it is now selected
    pub fn toggle_facet_value(&mut self, facet: &str, value: &str) -> bool {
        self.query.page = 1;
        self.query.selection.toggle_facet_value(facet, value)
    }

    pub fn set_facet<I, S>(&mut self, facet: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.selection.set_facet(facet, values);
        self.query.page = 1;
    }

    pub fn set_toggle(&mut self, toggle: &str, active: bool) {
        self.query.selection.set_toggle(toggle, active);
        self.query.page = 1;
    }

    pub fn set_sort(&mut self, key: &str, direction: SortDirection) {
        self.query.sort = Some(format!("{}:{}", key, direction));
    }

    /// Column-header click: same key flips direction, a new key starts ascending
    pub fn toggle_sort(&mut self, key: &str) -> SortDirection {
        let direction = match self.query.sort_parts() {
            (Some(current), direction) if current == key => {
                direction.unwrap_or_default().reversed()
            }
            _ => SortDirection::Asc,
        };
        self.set_sort(key, direction);
        direction
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.query.page_size = page_size;
    }

    pub fn next_page(&mut self) {
        self.query.page = self.query.page().saturating_add(1);
    }

    pub fn prev_page(&mut self) {
        self.query.page = self.query.page().saturating_sub(1).max(1);
    }

    /// Drop every facet, toggle and the text query
    pub fn clear_filters(&mut self) {
        self.query.selection = Default::default();
        self.query.text.clear();
        self.query.page = 1;
    }

    /// Back to the initial state (e.g. on tab switch), keeping the page size
    pub fn reset(&mut self) {
        let page_size = self.query.page_size;
        self.query = ListingQuery::new().with_page_size(page_size);
    }

    /// Derive the current page and store the clamped page index
    pub fn view<T: Record>(&mut self, engine: &ListingEngine<T>, records: &[T]) -> ListingPage<T> {
        let page = engine.run(records, &self.query);
        self.query.page = page.current_page;
        page
    }
}
