//! Listing engines for each board collection
//!
//! Derived values (applicant counts, company names, job titles) are computed
//! once per call from snapshots of the related collections, so an engine is
//! built per query and never observes a half-applied mutation.

use crate::core::FieldValue;
use crate::entities::{Application, Company, Job, User};
use crate::listing::{
    ComparatorRegistry, ListingEngine, PredicateSet, SearchField, SortDirection, collate,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Count records per key, skipping records without one
fn tally<'a, T: 'a>(
    records: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> Option<&str>,
) -> Arc<HashMap<String, usize>> {
    let mut counts = HashMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *counts.entry(k.to_string()).or_insert(0) += 1;
        }
    }
    Arc::new(counts)
}

fn lookup(counts: &HashMap<String, usize>, key: &str) -> usize {
    counts.get(key).copied().unwrap_or(0)
}

/// Jobs: newest first by default
pub fn job_engine(companies: &[Company], applications: &[Application]) -> ListingEngine<Job> {
    let company_names: Arc<HashMap<String, String>> = Arc::new(
        companies
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect(),
    );
    let applicants = tally(applications, |a: &Application| Some(a.job_id.as_str()));

    let predicates = PredicateSet::new()
        .facet("visibility", |job: &Job| {
            Some(FieldValue::String(job.visibility().to_string()))
        })
        .toggle("visible_only", |job: &Job| job.visible);

    let comparators = ComparatorRegistry::new()
        .timestamp("date", "posted_at")
        .text("title", "title")
        .count("applicants", move |job: &Job| lookup(&applicants, &job.id));

    let search_fields = vec![
        SearchField::field("title"),
        SearchField::field("category"),
        SearchField::field("location"),
        SearchField::resolved("company", move |job: &Job| {
            job.company_id
                .as_ref()
                .and_then(|id| company_names.get(id))
                .cloned()
        }),
    ];

    ListingEngine::new("jobs")
        .with_predicates(predicates)
        .with_search_fields(search_fields)
        .with_comparators(comparators)
        .with_default_direction(SortDirection::Desc)
}

/// Applications: most recent first by default
pub fn application_engine(jobs: &[Job]) -> ListingEngine<Application> {
    let job_titles: Arc<HashMap<String, String>> =
        Arc::new(jobs.iter().map(|j| (j.id.clone(), j.title.clone())).collect());
    let title_of = {
        let job_titles = job_titles.clone();
        move |app: &Application| job_titles.get(&app.job_id).cloned().unwrap_or_default()
    };

    let comparators = ComparatorRegistry::new()
        .timestamp("date", "applied_at")
        .text("name", "applicant_name")
        .custom("job", move |a: &Application, b: &Application| {
            collate(&title_of(a), &title_of(b))
        });

    let search_fields = vec![
        SearchField::field("applicant_name"),
        SearchField::field("email"),
        SearchField::resolved("job", move |app: &Application| {
            job_titles.get(&app.job_id).cloned()
        }),
    ];

    ListingEngine::new("applications")
        .with_predicates(PredicateSet::new())
        .with_search_fields(search_fields)
        .with_comparators(comparators)
        .with_default_direction(SortDirection::Desc)
}

pub fn company_engine(jobs: &[Job]) -> ListingEngine<Company> {
    let job_counts = tally(jobs, |j: &Job| j.company_id.as_deref());

    let comparators = ComparatorRegistry::new()
        .text("name", "name")
        .text("email", "email")
        .count("jobs", move |c: &Company| lookup(&job_counts, &c.id))
        .timestamp("date", "registered_at");

    ListingEngine::new("companies")
        .with_predicates(PredicateSet::new())
        .with_search_fields(vec![
            SearchField::field("name"),
            SearchField::field("email"),
            SearchField::field("location"),
        ])
        .with_comparators(comparators)
}

pub fn user_engine(applications: &[Application], jobs: &[Job]) -> ListingEngine<User> {
    let application_counts = tally(applications, |a: &Application| a.user_id.as_deref());
    let posted_counts = tally(jobs, |j: &Job| j.posted_by.as_deref());

    let predicates = PredicateSet::new().facet("status", |user: &User| {
        Some(FieldValue::String(user.status().to_string()))
    });

    let comparators = ComparatorRegistry::new()
        .text("name", "name")
        .text("email", "email")
        .count("applications", move |u: &User| {
            lookup(&application_counts, &u.id)
        })
        .count("jobs", move |u: &User| lookup(&posted_counts, &u.id))
        .timestamp("date", "joined_at");

    ListingEngine::new("users")
        .with_predicates(predicates)
        .with_search_fields(vec![SearchField::field("name"), SearchField::field("email")])
        .with_comparators(comparators)
}
