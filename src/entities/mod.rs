//! Job board records
//!
//! Four collections, each persisted under its [`Record::resource_name`](crate::core::Record::resource_name):
//! jobs, applications, companies and users.

pub mod application;
pub mod company;
pub mod de;
pub mod job;
pub mod seed;
pub mod user;

pub use application::{Application, ApplicationDraft, ApplicationStatus};
pub use company::{Company, CompanyDraft};
pub use job::{Job, JobDraft};
pub use user::{User, UserDraft, UserRole};
