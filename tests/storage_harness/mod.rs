//! Shared test harness for record stores and listing engines
//!
//! Provides `Posting`, a record whose fields cover every `FieldValue`
//! variant, a listing engine over it, and helpers for building fixtures.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! mod storage_harness;
//! use storage_harness::*;
//! ```
//!
//! Add `#[macro_use]` to the `mod` line only in files that invoke
//! `data_service_tests!`.

#![allow(dead_code, unused_macros)]

#[macro_use]
mod data_service_tests;

use chrono::{DateTime, TimeZone, Utc};
use jobboard::core::field::FieldValue;
use jobboard::impl_record;
use jobboard::listing::{ComparatorRegistry, ListingEngine, PredicateSet, SearchField};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Posting: covers every FieldValue variant
// ---------------------------------------------------------------------------

/// A test record with fields spanning all `FieldValue` variants.
///
/// - `title`, `category`: String
/// - `location`: optional String (missing for facet fail-closed tests)
/// - `applicants`: i64 (Integer variant)
/// - `salary`: f64 (Float variant)
/// - `remote`: bool (Boolean variant)
/// - `posted_at`: optional DateTime
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub id: String,
    pub title: String,
    pub category: String,
    pub location: Option<String>,
    pub applicants: i64,
    pub salary: f64,
    pub remote: bool,
    pub posted_at: Option<DateTime<Utc>>,
}

impl_record!(Posting, "postings", {
    "title" => title,
    "category" => category,
    "location" => location,
    "applicants" => applicants,
    "salary" => salary,
    "remote" => remote,
    "posted_at" => posted_at,
});

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn day(d: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).single()
}

pub fn create_posting(id: &str, title: &str, location: Option<&str>) -> Posting {
    Posting {
        id: id.to_string(),
        title: title.to_string(),
        category: "Engineering".to_string(),
        location: location.map(String::from),
        applicants: 0,
        salary: 0.0,
        remote: false,
        posted_at: None,
    }
}

pub fn create_full_posting(
    id: &str,
    title: &str,
    location: &str,
    applicants: i64,
    salary: f64,
    remote: bool,
) -> Posting {
    Posting {
        applicants,
        salary,
        remote,
        ..create_posting(id, title, Some(location))
    }
}

/// `n` postings with ids "p1".."pN", spread over three locations and
/// alternating categories
pub fn sample_batch(n: usize) -> Vec<Posting> {
    const LOCATIONS: [&str; 3] = ["Austin", "Paris", "Remote"];
    const TITLES: [&str; 4] = ["Engineer", "Designer", "Analyst", "Manager"];

    (1..=n)
        .map(|i| Posting {
            id: format!("p{}", i),
            title: format!("{} {}", TITLES[i % TITLES.len()], i),
            category: if i % 2 == 0 { "Design" } else { "Engineering" }.to_string(),
            location: Some(LOCATIONS[i % LOCATIONS.len()].to_string()),
            applicants: (i * 7 % 5) as i64,
            salary: 1000.0 * (i % 4) as f64,
            remote: i % 3 == 0,
            posted_at: day((i % 28 + 1) as u32),
        })
        .collect()
}

/// Engine with `location`/`category` facets, a `remote_only` toggle, and
/// sort keys `title` (default), `applicants`, `salary`, `date`
pub fn posting_engine() -> ListingEngine<Posting> {
    ListingEngine::new("postings")
        .with_predicates(PredicateSet::new().toggle("remote_only", |p: &Posting| p.remote))
        .with_search_fields(vec![
            SearchField::field("title"),
            SearchField::field("location"),
        ])
        .with_comparators(
            ComparatorRegistry::new()
                .text("title", "title")
                .numeric("applicants", "applicants")
                .numeric("salary", "salary")
                .timestamp("date", "posted_at"),
        )
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

pub fn ids(records: &[Posting]) -> Vec<&str> {
    records.iter().map(|p| p.id.as_str()).collect()
}

pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}

/// Whether `sub` appears in `full` in order (not necessarily contiguous)
pub fn is_subsequence(sub: &[Posting], full: &[Posting]) -> bool {
    let mut rest = full.iter();
    sub.iter().all(|wanted| rest.any(|candidate| candidate.id == wanted.id))
}

pub fn assert_field_value_string(fv: &FieldValue, expected: &str) {
    match fv {
        FieldValue::String(s) => assert_eq!(s, expected),
        other => panic!("Expected FieldValue::String({}), got {:?}", expected, other),
    }
}
