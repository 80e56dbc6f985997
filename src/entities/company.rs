//! Recruiter company accounts

use super::de::{lenient_opt_string, lenient_string, lenient_timestamp};
use crate::core::field::FieldFormat;
use crate::impl_record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Contact address; unique across companies
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,

    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub website: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub location: String,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub registered_at: Option<DateTime<Utc>>,
}

impl_record!(Company, "companies", {
    "name" => name,
    "email" => email,
    "website" => website,
    "location" => location,
    "registered_at" => registered_at,
});

impl Company {
    pub fn from_draft(draft: CompanyDraft) -> Self {
        let draft = draft.normalized();
        Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            email: draft.email,
            website: draft.website,
            location: draft.location,
            registered_at: Some(Utc::now()),
        }
    }
}

/// Input of the company registration form
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct CompanyDraft {
    #[validate(length(min = 2, max = 120, message = "name must be 2-120 characters"))]
    pub name: String,

    #[validate(email(message = "email address is invalid"))]
    pub email: String,

    #[validate(custom(function = "validate_website"))]
    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub location: String,
}

impl CompanyDraft {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            website: self.website.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            location: self.location.trim().to_string(),
        }
    }
}

fn validate_website(website: &str) -> Result<(), validator::ValidationError> {
    if FieldFormat::Url.matches(website) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("website")
            .with_message("website must be an http(s) URL".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_draft_validation() {
        let draft = CompanyDraft {
            name: " Acme ".to_string(),
            email: "HR@Acme.io".to_string(),
            website: Some("https://acme.io".to_string()),
            location: "Austin".to_string(),
        }
        .normalized();
        assert!(draft.validate().is_ok());

        let company = Company::from_draft(draft);
        assert_eq!(company.name, "Acme");
        assert_eq!(company.email, "hr@acme.io");
    }

    #[test]
    fn test_bad_website_rejected() {
        let draft = CompanyDraft {
            name: "Acme".to_string(),
            email: "hr@acme.io".to_string(),
            website: Some("acme dot io".to_string()),
            location: String::new(),
        };
        let errors = draft.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("website"));
    }
}
