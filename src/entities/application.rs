//! Job applications

use super::de::{lenient_enum, lenient_opt_string, lenient_string, lenient_timestamp};
use crate::core::field::{FieldFormat, FieldValue, IntoFieldValue};
use crate::impl_record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Review state of an application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Accepted and rejected applications are closed
    pub fn is_final(self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IntoFieldValue for ApplicationStatus {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::String(self.as_str().to_string()))
    }
}

/// An application submitted by a job seeker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub job_id: String,

    /// Signed-in applicant, when known
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub user_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub applicant_name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub phone: Option<String>,

    /// Uploaded resume, kept as a file name only
    #[serde(default, deserialize_with = "lenient_string")]
    pub resume_file: String,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub cover_letter: Option<String>,

    /// Unknown, null or non-string stored values load as pending
    #[serde(default, deserialize_with = "lenient_enum")]
    pub status: ApplicationStatus,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub applied_at: Option<DateTime<Utc>>,
}

impl_record!(Application, "applications", {
    "job_id" => job_id,
    "user_id" => user_id,
    "applicant_name" => applicant_name,
    "email" => email,
    "phone" => phone,
    "resume_file" => resume_file,
    "status" => status,
    "applied_at" => applied_at,
});

impl Application {
    /// Build a pending application for `job_id`
    pub fn from_draft(job_id: &str, draft: ApplicationDraft) -> Self {
        let draft = draft.normalized();
        Self {
            id: Uuid::new_v4().to_string(),
            job_id: job_id.to_string(),
            user_id: draft.user_id,
            applicant_name: draft.applicant_name,
            email: draft.email,
            phone: draft.phone,
            resume_file: draft.resume_file,
            cover_letter: draft.cover_letter,
            status: ApplicationStatus::Pending,
            applied_at: Some(Utc::now()),
        }
    }
}

/// Input of the application form
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct ApplicationDraft {
    #[serde(default)]
    pub user_id: Option<String>,

    #[validate(length(min = 2, max = 80, message = "name must be 2-80 characters"))]
    pub applicant_name: String,

    #[validate(email(message = "email address is invalid"))]
    pub email: String,

    #[validate(custom(function = "validate_phone"))]
    #[serde(default)]
    pub phone: Option<String>,

    #[validate(custom(function = "validate_resume_file"))]
    pub resume_file: String,

    #[validate(length(max = 5000, message = "cover letter is too long"))]
    #[serde(default)]
    pub cover_letter: Option<String>,
}

impl ApplicationDraft {
    /// Trim text, lower-case the email, drop blank optionals
    pub fn normalized(self) -> Self {
        Self {
            user_id: self.user_id.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            applicant_name: self.applicant_name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: self.phone.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            resume_file: self.resume_file.trim().to_string(),
            cover_letter: self
                .cover_letter
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Resume uploads accepted by the form
pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    if FieldFormat::Phone.matches(phone) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("phone")
            .with_message("phone number is invalid".into()))
    }
}

fn validate_resume_file(file: &str) -> Result<(), validator::ValidationError> {
    let extension = file
        .rsplit_once('.')
        .map(|(stem, ext)| (stem.trim(), ext.to_ascii_lowercase()));
    match extension {
        Some((stem, ext)) if !stem.is_empty() && RESUME_EXTENSIONS.contains(&ext.as_str()) => {
            Ok(())
        }
        _ => Err(validator::ValidationError::new("resume_file")
            .with_message("resume must be a .pdf, .doc or .docx file".into())),
    }
}
