//! Job postings

use super::de::{
    default_true, lenient_bool_default_true, lenient_opt_string, lenient_string,
    lenient_timestamp,
};
use crate::impl_record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A posted job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,

    /// Owning company
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub company_id: Option<String>,

    /// User account that created the posting
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub posted_by: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,

    /// "Full-time", "Part-time", "Contract", ...
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_type: String,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub salary: Option<String>,

    /// Rich-text body, stored as opaque HTML
    #[serde(default, deserialize_with = "lenient_string")]
    pub description_html: String,

    /// Hidden jobs stay in admin views but leave the public board
    #[serde(default = "default_true", deserialize_with = "lenient_bool_default_true")]
    pub visible: bool,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub posted_at: Option<DateTime<Utc>>,
}

impl_record!(Job, "jobs", {
    "title" => title,
    "company_id" => company_id,
    "posted_by" => posted_by,
    "category" => category,
    "location" => location,
    "job_type" => job_type,
    "salary" => salary,
    "visible" => visible,
    "posted_at" => posted_at,
});

impl Job {
    /// Build a visible job from a validated draft
    pub fn from_draft(draft: JobDraft) -> Self {
        let draft = draft.normalized();
        Self {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            company_id: Some(draft.company_id),
            posted_by: draft.posted_by,
            category: draft.category,
            location: draft.location,
            job_type: draft.job_type,
            salary: draft.salary,
            description_html: draft.description_html,
            visible: true,
            posted_at: Some(Utc::now()),
        }
    }

    /// Overwrite editable fields from a draft, keeping id, visibility and date
    pub fn apply_draft(&mut self, draft: JobDraft) {
        let draft = draft.normalized();
        self.title = draft.title;
        self.company_id = Some(draft.company_id);
        if draft.posted_by.is_some() {
            self.posted_by = draft.posted_by;
        }
        self.category = draft.category;
        self.location = draft.location;
        self.job_type = draft.job_type;
        self.salary = draft.salary;
        self.description_html = draft.description_html;
    }

    /// "visible" / "hidden", the value of the `visibility` facet
    pub fn visibility(&self) -> &'static str {
        if self.visible { "visible" } else { "hidden" }
    }
}

/// Input of the job posting form
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct JobDraft {
    #[validate(length(min = 2, max = 120, message = "title must be 2-120 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "company is required"))]
    pub company_id: String,

    #[serde(default)]
    pub posted_by: Option<String>,

    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,

    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,

    #[validate(length(min = 1, message = "job type is required"))]
    pub job_type: String,

    #[serde(default)]
    pub salary: Option<String>,

    #[validate(length(min = 1, message = "description is required"))]
    pub description_html: String,
}

impl JobDraft {
    /// Trim every text field and drop blank optionals
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            company_id: self.company_id.trim().to_string(),
            posted_by: self.posted_by.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            category: self.category.trim().to_string(),
            location: self.location.trim().to_string(),
            job_type: self.job_type.trim().to_string(),
            salary: self.salary.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            description_html: self.description_html.trim().to_string(),
        }
    }
}
