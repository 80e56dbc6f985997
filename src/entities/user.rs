//! End-user accounts

use super::de::{
    default_true, lenient_bool_default_true, lenient_enum, lenient_string, lenient_timestamp,
};
use crate::core::field::{FieldValue, IntoFieldValue};
use crate::impl_record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Seeker,
    Recruiter,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Seeker => "seeker",
            UserRole::Recruiter => "recruiter",
        }
    }
}

impl IntoFieldValue for UserRole {
    fn to_field_value(&self) -> Option<FieldValue> {
        Some(FieldValue::String(self.as_str().to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Unique across users
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,

    #[serde(default, deserialize_with = "lenient_enum")]
    pub role: UserRole,

    /// Blocked users are kept but flagged
    #[serde(default = "default_true", deserialize_with = "lenient_bool_default_true")]
    pub active: bool,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub joined_at: Option<DateTime<Utc>>,
}

impl_record!(User, "users", {
    "name" => name,
    "email" => email,
    "role" => role,
    "active" => active,
    "joined_at" => joined_at,
});

impl User {
    pub fn from_draft(draft: UserDraft) -> Self {
        let draft = draft.normalized();
        Self {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            email: draft.email,
            role: draft.role,
            active: true,
            joined_at: Some(Utc::now()),
        }
    }

    /// "active" / "blocked", the value of the `status` facet
    pub fn status(&self) -> &'static str {
        if self.active { "active" } else { "blocked" }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct UserDraft {
    #[validate(length(min = 2, max = 80, message = "name must be 2-80 characters"))]
    pub name: String,

    #[validate(email(message = "email address is invalid"))]
    pub email: String,

    #[serde(default)]
    pub role: UserRole,
}

impl UserDraft {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            role: self.role,
        }
    }
}
