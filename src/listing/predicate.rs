//! Facet and toggle predicates
//!
//! A [`FilterSelection`] names the values chosen per facet plus a set of
//! active toggles. Facets combine with AND, values within one facet with OR,
//! and an empty value list leaves that facet unconstrained.

use crate::core::{FieldValue, Record};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Reads the value a facet is matched against
pub type FacetAccessor<T> = Arc<dyn Fn(&T) -> Option<FieldValue> + Send + Sync>;

/// A named boolean filter
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Currently active filter choices for one view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    /// facet name -> accepted values
    pub facets: BTreeMap<String, Vec<String>>,
    /// names of active toggle predicates
    pub toggles: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: constrain `facet` to `values`
    pub fn with_facet<I, S>(mut self, facet: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_facet(facet, values);
        self
    }

    /// Builder: activate a toggle
    pub fn with_toggle(mut self, toggle: &str) -> Self {
        self.toggles.insert(toggle.to_string());
        self
    }

    /// Replace the accepted values of a facet
    pub fn set_facet<I, S>(&mut self, facet: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values
            .into_iter()
            .map(Into::into)
            .collect::<indexmap::IndexSet<String>>()
            .into_iter()
            .collect();
        if values.is_empty() {
            self.facets.remove(facet);
        } else {
            self.facets.insert(facet.to_string(), values);
        }
    }

    /// Add `value` to a facet if absent, remove it if present
    ///
    /// Mirrors a checkbox click. Returns whether the value is now selected.
    pub fn toggle_facet_value(&mut self, facet: &str, value: &str) -> bool {
        let values = self.facets.entry(facet.to_string()).or_default();
        let selected = if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
            false
        } else {
            values.push(value.to_string());
            true
        };
        if values.is_empty() {
            self.facets.remove(facet);
        }
        selected
    }

    pub fn set_toggle(&mut self, toggle: &str, active: bool) {
        if active {
            self.toggles.insert(toggle.to_string());
        } else {
            self.toggles.remove(toggle);
        }
    }

    /// Facets that actually constrain (non-empty value lists)
    pub fn active_facets(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.facets
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// True when nothing is selected
    pub fn is_empty(&self) -> bool {
        self.active_facets().next().is_none() && self.toggles.is_empty()
    }
}

/// Named predicates for one record type
///
/// Facets are read straight from [`Record::field_value`] unless an accessor
/// is registered (for derived values such as `visible` -> "visible"/"hidden").
pub struct PredicateSet<T> {
    accessors: IndexMap<String, FacetAccessor<T>>,
    toggles: IndexMap<String, Predicate<T>>,
}

impl<T: Record> PredicateSet<T> {
    pub fn new() -> Self {
        Self {
            accessors: IndexMap::new(),
            toggles: IndexMap::new(),
        }
    }

    /// Register a derived accessor for a facet
    pub fn facet<F>(mut self, name: &str, accessor: F) -> Self
    where
        F: Fn(&T) -> Option<FieldValue> + Send + Sync + 'static,
    {
        self.accessors.insert(name.to_string(), Arc::new(accessor));
        self
    }

    /// Register a toggle predicate
    pub fn toggle<F>(mut self, name: &str, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.toggles.insert(name.to_string(), Arc::new(predicate));
        self
    }

    /// Value of `facet` for `record`, via accessor or plain field lookup
    pub fn facet_value(&self, record: &T, facet: &str) -> Option<FieldValue> {
        match self.accessors.get(facet) {
            Some(accessor) => accessor(record),
            None => record.field_value(facet),
        }
    }

    /// Whether `record` survives `selection`
    ///
    /// A missing field fails a non-empty facet but is ignored by an empty one.
    /// Toggles with no registered predicate impose nothing.
    pub fn matches(&self, record: &T, selection: &FilterSelection) -> bool {
        let facets_ok = selection.active_facets().all(|(facet, accepted)| {
            self.facet_value(record, facet)
                .and_then(|value| value.facet_key())
                .is_some_and(|key| accepted.iter().any(|v| *v == key))
        });

        facets_ok
            && selection
                .toggles
                .iter()
                .filter_map(|name| self.toggles.get(name))
                .all(|predicate| predicate(record))
    }

    /// Toggle names in `selection` that this set does not know
    pub fn unknown_toggles<'a>(&self, selection: &'a FilterSelection) -> Vec<&'a str> {
        selection
            .toggles
            .iter()
            .filter(|name| !self.toggles.contains_key(name.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Distinct facet values present in `records`, in first-seen order
    ///
    /// Views use this to render the checkbox list for a facet.
    pub fn facet_options(&self, records: &[T], facet: &str) -> Vec<String> {
        let mut seen = indexmap::IndexSet::new();
        for record in records {
            if let Some(key) = self.facet_value(record, facet).and_then(|v| v.facet_key()) {
                if !key.is_empty() {
                    seen.insert(key);
                }
            }
        }
        seen.into_iter().collect()
    }
}

impl<T: Record> Default for PredicateSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for PredicateSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateSet")
            .field("accessors", &self.accessors.keys().collect::<Vec<_>>())
            .field("toggles", &self.toggles.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    struct Posting {
        id: String,
        location: Option<String>,
        category: String,
        visible: bool,
    }

    crate::impl_record!(Posting, "postings", {
        "location" => location,
        "category" => category,
        "visible" => visible,
    });

    fn posting(id: &str, location: Option<&str>, category: &str, visible: bool) -> Posting {
        Posting {
            id: id.to_string(),
            location: location.map(String::from),
            category: category.to_string(),
            visible,
        }
    }

    fn predicates() -> PredicateSet<Posting> {
        PredicateSet::new()
            .facet("visibility", |p: &Posting| {
                Some(FieldValue::String(
                    if p.visible { "visible" } else { "hidden" }.to_string(),
                ))
            })
            .toggle("visible_only", |p: &Posting| p.visible)
    }

    #[test]
    fn test_empty_selection_matches_everything() {
        let set = predicates();
        let p = posting("1", None, "Design", false);
        assert!(set.matches(&p, &FilterSelection::new()));
    }

    #[test]
    fn test_values_within_facet_are_ored() {
        let set = predicates();
        let selection = FilterSelection::new().with_facet("location", ["Austin", "Paris"]);

        assert!(set.matches(&posting("1", Some("Austin"), "Eng", true), &selection));
        assert!(set.matches(&posting("2", Some("Paris"), "Eng", true), &selection));
        assert!(!set.matches(&posting("3", Some("Berlin"), "Eng", true), &selection));
    }

    #[test]
    fn test_facets_are_anded() {
        let set = predicates();
        let selection = FilterSelection::new()
            .with_facet("location", ["Austin"])
            .with_facet("category", ["Design"]);

        assert!(set.matches(&posting("1", Some("Austin"), "Design", true), &selection));
        assert!(!set.matches(&posting("2", Some("Austin"), "Eng", true), &selection));
    }

    #[test]
    fn test_missing_field_fails_closed() {
        let set = predicates();
        let p = posting("1", None, "Eng", true);

        let constrained = FilterSelection::new().with_facet("location", ["Austin"]);
        assert!(!set.matches(&p, &constrained));

        let mut empty_facet = FilterSelection::new();
        empty_facet.facets.insert("location".to_string(), Vec::new());
        assert!(set.matches(&p, &empty_facet));
    }

    #[test]
    fn test_accessor_and_toggle() {
        let set = predicates();
        let hidden = posting("1", Some("Austin"), "Eng", false);

        let by_facet = FilterSelection::new().with_facet("visibility", ["hidden"]);
        assert!(set.matches(&hidden, &by_facet));

        let by_toggle = FilterSelection::new().with_toggle("visible_only");
        assert!(!set.matches(&hidden, &by_toggle));
    }

    #[test]
    fn test_unknown_toggle_is_ignored_and_reported() {
        let set = predicates();
        let selection = FilterSelection::new().with_toggle("remote_only");

        assert!(set.matches(&posting("1", None, "Eng", true), &selection));
        assert_eq!(set.unknown_toggles(&selection), vec!["remote_only"]);
    }

    #[test]
    fn test_toggle_facet_value_adds_and_removes() {
        let mut selection = FilterSelection::new();
        assert!(selection.toggle_facet_value("location", "Austin"));
        assert_eq!(selection.facets["location"], vec!["Austin".to_string()]);

        assert!(!selection.toggle_facet_value("location", "Austin"));
        assert!(!selection.facets.contains_key("location"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_facet_options_are_distinct_in_first_seen_order() {
        let set = predicates();
        let records = vec![
            posting("1", Some("Paris"), "Eng", true),
            posting("2", None, "Eng", true),
            posting("3", Some("Austin"), "Eng", true),
            posting("4", Some("Paris"), "Eng", true),
        ];

        assert_eq!(set.facet_options(&records, "location"), vec!["Paris", "Austin"]);
    }
}
