//! Default dataset installed when storage holds no records
//!
//! Ids are short numeric strings, the shape the first snapshots used.

use super::application::{Application, ApplicationStatus};
use super::company::Company;
use super::job::Job;
use super::user::{User, UserRole};
use chrono::{DateTime, TimeZone, Utc};

fn day(month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(2024, month, day, 9, 0, 0).single()
}

pub fn companies() -> Vec<Company> {
    [
        ("1", "Northwind Labs", "jobs@northwind.dev", "Austin", 1),
        ("2", "Bluefin Studio", "hello@bluefin.design", "Paris", 2),
        ("3", "Ironbark Logistics", "careers@ironbark.co", "Remote", 3),
    ]
    .into_iter()
    .map(|(id, name, email, location, month)| Company {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        website: Some(format!("https://{}", email.split('@').nth(1).unwrap_or_default())),
        location: location.to_string(),
        registered_at: day(month, 1),
    })
    .collect()
}

pub fn jobs() -> Vec<Job> {
    [
        ("1", "Backend Engineer", "1", "Engineering", "Austin", "Full-time", Some("$140k"), 5, 2),
        ("2", "Product Designer", "2", "Design", "Paris", "Full-time", Some("€70k"), 5, 6),
        ("3", "Data Analyst", "3", "Data", "Remote", "Contract", None, 5, 9),
        ("4", "Frontend Engineer", "1", "Engineering", "Remote", "Part-time", None, 5, 14),
        (
            "5",
            "Warehouse Coordinator",
            "3",
            "Operations",
            "Austin",
            "Full-time",
            Some("$55k"),
            6,
            1,
        ),
        ("6", "Brand Illustrator", "2", "Design", "Remote", "Contract", None, 6, 3),
        (
            "7",
            "Site Reliability Engineer",
            "1",
            "Engineering",
            "Austin",
            "Full-time",
            Some("$160k"),
            6,
            10,
        ),
    ]
    .into_iter()
    .map(
        |(id, title, company, category, location, job_type, salary, month, d)| Job {
            id: id.to_string(),
            title: title.to_string(),
            company_id: Some(company.to_string()),
            posted_by: Some("2".to_string()),
            category: category.to_string(),
            location: location.to_string(),
            job_type: job_type.to_string(),
            salary: salary.map(String::from),
            description_html: format!("<p>{} at a growing team.</p>", title),
            visible: true,
            posted_at: day(month, d),
        },
    )
    .collect()
}

pub fn users() -> Vec<User> {
    [
        ("1", "Maya Chen", "maya@example.com", UserRole::Seeker, 4),
        ("2", "Omar Haddad", "omar@northwind.dev", UserRole::Recruiter, 1),
        ("3", "Lena Fischer", "lena@example.com", UserRole::Seeker, 5),
    ]
    .into_iter()
    .map(|(id, name, email, role, month)| User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        active: true,
        joined_at: day(month, 12),
    })
    .collect()
}

pub fn applications() -> Vec<Application> {
    [
        ("1", "1", "1", "Maya Chen", "maya@example.com", ApplicationStatus::Reviewed, 5, 4),
        ("2", "1", "3", "Lena Fischer", "lena@example.com", ApplicationStatus::Pending, 5, 8),
        ("3", "2", "1", "Maya Chen", "maya@example.com", ApplicationStatus::Pending, 5, 10),
        ("4", "7", "3", "Lena Fischer", "lena@example.com", ApplicationStatus::Accepted, 6, 12),
    ]
    .into_iter()
    .map(|(id, job, user, name, email, status, month, d)| Application {
        id: id.to_string(),
        job_id: job.to_string(),
        user_id: Some(user.to_string()),
        applicant_name: name.to_string(),
        email: email.to_string(),
        phone: None,
        resume_file: format!(
            "{}_resume.pdf",
            name.split(' ').next().unwrap_or("cv").to_lowercase()
        ),
        cover_letter: None,
        status,
        applied_at: day(month, d),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_references_resolve() {
        let companies: HashSet<String> = companies().into_iter().map(|c| c.id).collect();
        let jobs = jobs();
        let job_ids: HashSet<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
        let user_ids: HashSet<String> = users().into_iter().map(|u| u.id).collect();

        for job in &jobs {
            assert!(companies.contains(job.company_id.as_deref().unwrap_or_default()));
            assert!(job.posted_at.is_some());
        }
        for app in applications() {
            assert!(job_ids.contains(app.job_id.as_str()));
            assert!(user_ids.contains(app.user_id.as_deref().unwrap_or_default()));
        }
    }
}
