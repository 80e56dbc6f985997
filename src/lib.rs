//! # Job Board
//!
//! A job board record model with a generic filter/sort/paginate listing engine.
//!
//! ## Features
//!
//! - **Record Model**: Jobs, applications, companies and users behind one `Record` trait
//! - **Listing Engine**: Faceted filters, free-text search, named sort keys, clamped pagination
//! - **Derived Sort Keys**: Applicant and job counts computed from related collections
//! - **Forgiving Persistence**: JSON snapshots per collection, malformed records skipped
//! - **Seeding**: Default dataset installed into empty storage
//! - **Change Events**: Every mutation published on a broadcast bus
//! - **Configuration-Based**: Storage, seeding and page sizes from YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jobboard::prelude::*;
//!
//! let board = JobBoard::from_config(BoardConfig::default()).await?;
//!
//! let mut state = board.new_state(ListingView::Jobs);
//! state.set_text("engineer");
//! state.toggle_facet_value("location", "Austin");
//! state.set_sort("date", SortDirection::Desc);
//!
//! let page = board.job_listing(state.query())?;
//! for job in &page.items {
//!     println!("{} ({})", job.title, job.location);
//! }
//! println!("page {} of {}", page.current_page, page.page_count);
//! ```

pub mod board;
pub mod config;
pub mod core;
pub mod entities;
pub mod listing;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        error::{BoardError, BoardResult, EntityError, StorageError, ValidationError},
        events::{BoardEvent, ChangeKind, EventBus, EventEnvelope},
        field::{FieldFormat, FieldValue, IntoFieldValue},
        record::Record,
        service::DataService,
    };

    // === Macros ===
    pub use crate::impl_record;

    // === Records ===
    pub use crate::entities::{
        Application, ApplicationDraft, ApplicationStatus, Company, CompanyDraft, Job, JobDraft,
        User, UserDraft, UserRole,
    };

    // === Listing ===
    pub use crate::listing::{
        ComparatorRegistry, Debouncer, FilterSelection, ListingEngine, ListingPage, ListingQuery,
        ListingState, PageLink, PredicateSet, SearchField, SortDirection, page_window,
    };

    // === Board ===
    pub use crate::board::{JobBoard, ListingView};

    // === Storage ===
    pub use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, RecordStore};

    // === Config ===
    pub use crate::config::{BoardConfig, PageSizes, StorageConfig, StorageKind};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}
