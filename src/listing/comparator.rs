//! Sort keys and the comparator registry

use crate::core::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

impl SortDirection {
    /// Parse `asc` / `desc` (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Asc),
            "desc" | "descending" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    /// Orient an ascending comparison result
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived numeric value, e.g. the number of applications for a job
pub type CountAccessor<T> = Arc<dyn Fn(&T) -> usize + Send + Sync>;

/// Arbitrary ascending comparison
pub type CompareFn<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// How one sort key orders records (always ascending)
pub enum SortKey<T> {
    /// Collated string comparison; missing sorts as ""
    Text(String),
    /// Numeric comparison; missing sorts as 0
    Numeric(String),
    /// Epoch-millisecond comparison; missing sorts as 0 (oldest)
    Timestamp(String),
    /// Numeric comparison of a caller-supplied count
    Count(CountAccessor<T>),
    /// Composite or otherwise special ordering
    Custom(CompareFn<T>),
}

impl<T: Record> SortKey<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        match self {
            SortKey::Text(field) => collate(&text_of(a, field), &text_of(b, field)),
            SortKey::Numeric(field) | SortKey::Timestamp(field) => {
                number_of(a, field).total_cmp(&number_of(b, field))
            }
            SortKey::Count(count) => count(a).cmp(&count(b)),
            SortKey::Custom(compare) => compare(a, b),
        }
    }
}

impl<T> fmt::Debug for SortKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Text(field) => f.debug_tuple("Text").field(field).finish(),
            SortKey::Numeric(field) => f.debug_tuple("Numeric").field(field).finish(),
            SortKey::Timestamp(field) => f.debug_tuple("Timestamp").field(field).finish(),
            SortKey::Count(_) => f.write_str("Count(..)"),
            SortKey::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

fn text_of<T: Record>(record: &T, field: &str) -> String {
    record
        .field_value(field)
        .and_then(|v| v.facet_key())
        .unwrap_or_default()
}

fn number_of<T: Record>(record: &T, field: &str) -> f64 {
    record.field_value(field).map(|v| v.sort_number()).unwrap_or(0.0)
}

/// Human-oriented string order
///
/// Compares case-folded text first so "apple" and "Banana" sort the way a
/// reader expects, then falls back to the raw strings to keep the order total.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Sort key name -> ascending comparator
///
/// Direction is never baked into an entry; [`ComparatorRegistry::compare_directed`]
/// applies it uniformly.
pub struct ComparatorRegistry<T> {
    entries: IndexMap<String, SortKey<T>>,
    default_key: Option<String>,
}

impl<T: Record> ComparatorRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            default_key: None,
        }
    }

    /// Register a key; the first key registered becomes the default
    pub fn register(mut self, key: &str, sort: SortKey<T>) -> Self {
        if self.default_key.is_none() {
            self.default_key = Some(key.to_string());
        }
        self.entries.insert(key.to_string(), sort);
        self
    }

    pub fn text(self, key: &str, field: &str) -> Self {
        self.register(key, SortKey::Text(field.to_string()))
    }

    pub fn numeric(self, key: &str, field: &str) -> Self {
        self.register(key, SortKey::Numeric(field.to_string()))
    }

    pub fn timestamp(self, key: &str, field: &str) -> Self {
        self.register(key, SortKey::Timestamp(field.to_string()))
    }

    pub fn count<F>(self, key: &str, count: F) -> Self
    where
        F: Fn(&T) -> usize + Send + Sync + 'static,
    {
        self.register(key, SortKey::Count(Arc::new(count)))
    }

    pub fn custom<F>(self, key: &str, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.register(key, SortKey::Custom(Arc::new(compare)))
    }

    /// Override which key is used when none (or an unknown one) is requested
    pub fn with_default(mut self, key: &str) -> Self {
        self.default_key = Some(key.to_string());
        self
    }

    pub fn default_key(&self) -> Option<&str> {
        self.default_key.as_deref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// The registered key to use for a request: itself if known, else the default
    pub fn resolve_key<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        match requested {
            Some(key) if self.contains(key) => Some(key),
            _ => self.default_key(),
        }
    }

    /// Ascending comparison under `key`; an unknown key treats all records as equal
    pub fn compare(&self, a: &T, b: &T, key: &str) -> Ordering {
        self.entries
            .get(key)
            .map(|sort| sort.compare(a, b))
            .unwrap_or(Ordering::Equal)
    }

    /// Comparison under `key` oriented by `direction`
    pub fn compare_directed(&self, a: &T, b: &T, key: &str, direction: SortDirection) -> Ordering {
        direction.apply(self.compare(a, b, key))
    }
}

impl<T: Record> Default for ComparatorRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ComparatorRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorRegistry")
            .field("entries", &self.entries)
            .field("default_key", &self.default_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use std::collections::HashMap;

    #[derive(Clone, Debug)]
    struct Posting {
        id: String,
        title: Option<String>,
        posted_at: Option<DateTime<Utc>>,
    }

    crate::impl_record!(Posting, "postings", {
        "title" => title,
        "posted_at" => posted_at,
    });

    fn posting(id: &str, title: Option<&str>, day: Option<u32>) -> Posting {
        Posting {
            id: id.to_string(),
            title: title.map(String::from),
            posted_at: day.map(|d| Utc.with_ymd_and_hms(2024, 3, d, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_direction_parse_and_apply() {
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("sideways"), None);
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Asc.reversed(), SortDirection::Desc);
    }

    #[test]
    fn test_collate_is_case_folded_then_total() {
        assert_eq!(collate("apple", "Banana"), Ordering::Less);
        assert_eq!(collate("Zeta", "alpha"), Ordering::Greater);
        assert_ne!(collate("abc", "ABC"), Ordering::Equal);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_text_key_missing_sorts_as_empty() {
        let registry = ComparatorRegistry::new().text("title", "title");
        let untitled = posting("1", None, None);
        let titled = posting("2", Some("Analyst"), None);

        assert_eq!(registry.compare(&untitled, &titled, "title"), Ordering::Less);
    }

    #[test]
    fn test_timestamp_missing_is_oldest() {
        let registry = ComparatorRegistry::new().timestamp("date", "posted_at");
        let undated = posting("1", None, None);
        let dated = posting("2", None, Some(1));

        assert_eq!(registry.compare(&undated, &dated, "date"), Ordering::Less);
        assert_eq!(
            registry.compare_directed(&undated, &dated, "date", SortDirection::Desc),
            Ordering::Greater
        );
    }

    #[test]
    fn test_count_key_uses_accessor() {
        let counts = HashMap::from([("a".to_string(), 3usize), ("b".to_string(), 0)]);
        let registry = ComparatorRegistry::new()
            .count("applicants", move |p: &Posting| counts.get(&p.id).copied().unwrap_or(0));

        let a = posting("a", None, None);
        let b = posting("b", None, None);
        assert_eq!(registry.compare(&a, &b, "applicants"), Ordering::Greater);
    }

    #[test]
    fn test_default_and_unknown_keys() {
        let registry = ComparatorRegistry::<Posting>::new()
            .text("title", "title")
            .timestamp("date", "posted_at")
            .with_default("date");

        assert_eq!(registry.resolve_key(None), Some("date"));
        assert_eq!(registry.resolve_key(Some("bogus")), Some("date"));
        assert_eq!(registry.resolve_key(Some("title")), Some("title"));
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["title", "date"]);

        let a = posting("1", Some("b"), Some(2));
        let b = posting("2", Some("a"), Some(1));
        assert_eq!(registry.compare(&a, &b, "bogus"), Ordering::Equal);
    }
}
