//! Free-text search over designated fields

use crate::core::Record;
use std::fmt;
use std::sync::Arc;

/// Resolves a searchable string that is not stored on the record itself
pub type TextResolver<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// One searchable field
pub enum SearchField<T> {
    /// A field read through [`Record::field_value`]
    Field(String),
    /// A value computed from the record, e.g. a company name looked up by id
    Resolved { label: String, resolve: TextResolver<T> },
}

impl<T> SearchField<T> {
    pub fn field(name: &str) -> Self {
        SearchField::Field(name.to_string())
    }

    pub fn resolved<F>(label: &str, resolve: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        SearchField::Resolved {
            label: label.to_string(),
            resolve: Arc::new(resolve),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            SearchField::Field(name) => name,
            SearchField::Resolved { label, .. } => label,
        }
    }
}

impl<T: Record> SearchField<T> {
    /// Lower-cased text of this field for `record`; empty when missing
    fn text(&self, record: &T) -> String {
        match self {
            SearchField::Field(name) => record
                .field_value(name)
                .map(|v| v.search_text())
                .unwrap_or_default(),
            SearchField::Resolved { resolve, .. } => {
                resolve(record).unwrap_or_default().to_lowercase()
            }
        }
    }
}

impl<T> Clone for SearchField<T> {
    fn clone(&self) -> Self {
        match self {
            SearchField::Field(name) => SearchField::Field(name.clone()),
            SearchField::Resolved { label, resolve } => SearchField::Resolved {
                label: label.clone(),
                resolve: Arc::clone(resolve),
            },
        }
    }
}

impl<T> fmt::Debug for SearchField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchField::Field(name) => f.debug_tuple("Field").field(name).finish(),
            SearchField::Resolved { label, .. } => f.debug_tuple("Resolved").field(label).finish(),
        }
    }
}

/// Case-insensitive substring match of `query` against any of `fields`
///
/// An empty query matches every record.
pub fn matches_query<T: Record>(record: &T, query: &str, fields: &[SearchField<T>]) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|field| field.text(record).contains(&needle))
}
