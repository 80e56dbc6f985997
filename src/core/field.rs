//! Field value types and format validation

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

/// A polymorphic scalar read out of a record by field name
///
/// Records never hand the listing engine their concrete fields; every filter,
/// search and sort goes through this type so one engine can serve any entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Canonical string used for facet membership checks
    ///
    /// Returns `None` for `Null`, which makes a null field fail any non-empty
    /// facet constraint.
    pub fn facet_key(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Uuid(u) => Some(u.to_string()),
            FieldValue::DateTime(dt) => Some(dt.to_rfc3339()),
            FieldValue::Null => None,
        }
    }

    /// Lower-cased text for substring search; empty for `Null`
    pub fn search_text(&self) -> String {
        self.facet_key().unwrap_or_default().to_lowercase()
    }

    /// Numeric projection used by numeric and timestamp comparators
    ///
    /// Timestamps become epoch milliseconds. Anything non-numeric is `0.0`.
    pub fn sort_number(&self) -> f64 {
        match self {
            FieldValue::Integer(i) => *i as f64,
            FieldValue::Float(f) if f.is_finite() => *f,
            FieldValue::Boolean(b) => f64::from(u8::from(*b)),
            FieldValue::DateTime(dt) => dt.timestamp_millis() as f64,
            FieldValue::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

/// Conversion from a concrete record field into an optional [`FieldValue`]
///
/// Used by [`impl_record!`](crate::impl_record) so each entity only lists its
/// field names; `Option` fields map `None` to a missing value.
pub trait IntoFieldValue {
    fn to_field_value(&self) -> Option<FieldValue>;
}

impl IntoFieldValue for String {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::String(self.clone()))
    }
}

impl IntoFieldValue for bool {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Boolean(*self))
    }
}

impl IntoFieldValue for i64 {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Integer(*self))
    }
}

impl IntoFieldValue for f64 {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Float(*self))
    }
}

impl IntoFieldValue for Uuid {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::Uuid(*self))
    }
}

impl IntoFieldValue for DateTime<Utc> {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::DateTime(*self))
    }
}

impl<T: IntoFieldValue> IntoFieldValue for Option<T> {
    fn to_field_value(&self) -> Option<FieldValue> {
        self.as_ref().and_then(IntoFieldValue::to_field_value)
    }
}

/// Field format validators
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Email,
    Url,
    Phone,
    Custom(Regex),
}

impl FieldFormat {
    /// Validate a field value against this format
    pub fn validate(&self, value: &FieldValue) -> bool {
        match value.as_string() {
            Some(s) => self.matches(s),
            None => false,
        }
    }

    /// Validate a raw string against this format
    pub fn matches(&self, value: &str) -> bool {
        match self {
            FieldFormat::Email => Self::email_regex().is_match(value),
            FieldFormat::Url => Self::url_regex().is_match(value),
            FieldFormat::Phone => Self::phone_regex().is_match(&Self::strip_phone(value)),
            FieldFormat::Custom(regex) => regex.is_match(value),
        }
    }

    fn email_regex() -> &'static Regex {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
        })
    }

    fn url_regex() -> &'static Regex {
        static URL_REGEX: OnceLock<Regex> = OnceLock::new();
        URL_REGEX.get_or_init(|| {
            Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap()
        })
    }

    fn phone_regex() -> &'static Regex {
        static PHONE_REGEX: OnceLock<Regex> = OnceLock::new();
        PHONE_REGEX.get_or_init(|| {
            // At least 8 digits, max 15 (E.164)
            Regex::new(r"^\+?[1-9]\d{7,14}$").unwrap()
        })
    }

    /// Phone numbers are typed with separators; only digits and a leading `+` count
    fn strip_phone(value: &str) -> String {
        value
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '+')
            .collect()
    }
}
