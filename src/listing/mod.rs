//! Listing query engine
//!
//! Filtering, free-text search, sorting and pagination over a homogeneous
//! record collection. Every operation here is pure and total: malformed
//! records degrade to "does not match" or "sorts as empty/zero", and
//! out-of-range pages are clamped.
//!
//! ```text
//! records ──▶ PredicateSet ──▶ matches_query ──▶ ComparatorRegistry ──▶ paginator ──▶ ListingPage
//!              (facets AND,      (substring,         (key + direction)      (clamp +
//!               values OR)        any field)                                  slice)
//! ```

pub mod comparator;
pub mod debounce;
pub mod paginator;
pub mod pipeline;
pub mod predicate;
pub mod query;
pub mod search;
pub mod state;

pub use comparator::{ComparatorRegistry, SortDirection, SortKey, collate};
pub use debounce::Debouncer;
pub use paginator::{PageLink, PaginationMeta, page_count, page_window};
pub use pipeline::{ListingEngine, ListingPage};
pub use predicate::{FilterSelection, PredicateSet};
pub use query::ListingQuery;
pub use search::{SearchField, matches_query};
pub use state::ListingState;
