//! The job board: four record collections, their persistence, and the
//! listing views built over them
//!
//! Every mutation follows the same order: stage the change on copies of the
//! affected collections, write those snapshots to storage, then make them
//! current in memory and publish a [`BoardEvent`]. A failed write leaves both
//! storage and memory as they were. Mutations are serialized so a staged copy
//! never misses a concurrent change.

pub mod listings;
pub mod reconcile;

use crate::config::{BoardConfig, PageSizes};
use crate::core::{BoardEvent, BoardResult, DataService, EntityError, EventBus, Record};
use crate::entities::{
    Application, ApplicationDraft, ApplicationStatus, Company, CompanyDraft, Job, JobDraft, User,
    UserDraft, seed,
};
use crate::listing::{Debouncer, ListingPage, ListingQuery, ListingState};
use crate::storage::{
    KeyValueStore, RecordStore, SeedOptions, SnapshotWrite, hydrate, open_storage, write_snapshots,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};
use validator::Validate;

pub use reconcile::find_by_param;

/// The listing views a board exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingView {
    /// Public board, visible jobs only
    Jobs,
    AdminJobs,
    Applications,
    Companies,
    Users,
}

impl ListingView {
    pub fn page_size(self, sizes: &PageSizes) -> usize {
        match self {
            ListingView::Jobs => sizes.jobs,
            ListingView::AdminJobs => sizes.admin_jobs,
            ListingView::Applications => sizes.applications,
            ListingView::Companies => sizes.companies,
            ListingView::Users => sizes.users,
        }
    }
}

pub struct JobBoard {
    config: BoardConfig,
    storage: Arc<dyn KeyValueStore>,
    jobs: RecordStore<Job>,
    applications: RecordStore<Application>,
    companies: RecordStore<Company>,
    users: RecordStore<User>,
    events: EventBus,
    writes: Mutex<()>,
}

/// A collection change that has been computed but not yet made current
struct Staged<'a, T: Record> {
    store: &'a RecordStore<T>,
    records: Vec<T>,
    write: SnapshotWrite,
}

impl<'a, T: Record + Serialize> Staged<'a, T> {
    /// Apply `change` to a copy of `store`, returning its result alongside
    fn new<R>(
        store: &'a RecordStore<T>,
        change: impl FnOnce(&mut IndexMap<String, T>) -> R,
    ) -> BoardResult<(Self, R)> {
        let before = store.snapshot()?;
        let (records, outcome) = store.staged(change)?;
        let write = SnapshotWrite::new(&before, &records)?;
        Ok((Self { store, records, write }, outcome))
    }

    fn commit(self) -> BoardResult<()> {
        self.store.replace_all(self.records)?;
        Ok(())
    }
}

/// Remove and return every value matching `predicate`, keeping the rest in order
fn take_where<T>(records: &mut IndexMap<String, T>, predicate: impl Fn(&T) -> bool) -> Vec<T> {
    let (taken, kept): (IndexMap<String, T>, IndexMap<String, T>) =
        std::mem::take(records).into_iter().partition(|(_, r)| predicate(r));
    *records = kept;
    taken.into_values().collect()
}

impl JobBoard {
    /// Open the board over `storage`, loading every collection
    ///
    /// When `seed_on_empty` is set and storage holds no collection at all,
    /// the whole seed dataset is installed. Storage that already holds any
    /// collection is never partly seeded, so seed rows cannot point at
    /// missing records. The four collections hydrate concurrently, so the
    /// seed delay is paid once.
    pub async fn open(config: BoardConfig, storage: Arc<dyn KeyValueStore>) -> BoardResult<Self> {
        config.validate()?;
        let kv = storage.as_ref();
        let fresh = kv.keys().await?.is_empty();
        if config.seed_on_empty && !fresh {
            debug!("Storage already holds data, skipping seed");
        }
        let options = SeedOptions {
            enabled: config.seed_on_empty && fresh,
            delay: config.seed_delay(),
        };

        let (
            (jobs, jobs_seeded),
            (applications, applications_seeded),
            (companies, companies_seeded),
            (users, users_seeded),
        ) = tokio::try_join!(
            hydrate(kv, Job::resource_name(), seed::jobs, options),
            hydrate(kv, Application::resource_name(), seed::applications, options),
            hydrate(kv, Company::resource_name(), seed::companies, options),
            hydrate(kv, User::resource_name(), seed::users, options),
        )?;

        info!(
            jobs = jobs.len(),
            applications = applications.len(),
            companies = companies.len(),
            users = users.len(),
            seeded = jobs_seeded || applications_seeded || companies_seeded || users_seeded,
            "Job board opened"
        );

        Ok(Self {
            config,
            storage,
            jobs: RecordStore::from_records(jobs),
            applications: RecordStore::from_records(applications),
            companies: RecordStore::from_records(companies),
            users: RecordStore::from_records(users),
            events: EventBus::default(),
            writes: Mutex::new(()),
        })
    }

    /// Open the storage backend named in `config`, then the board
    pub async fn from_config(config: BoardConfig) -> BoardResult<Self> {
        config.validate()?;
        let storage = open_storage(&config.storage).await?;
        Self::open(config, storage).await
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn jobs(&self) -> BoardResult<Vec<Job>> {
        Ok(self.jobs.snapshot()?)
    }

    pub fn applications(&self) -> BoardResult<Vec<Application>> {
        Ok(self.applications.snapshot()?)
    }

    pub fn companies(&self) -> BoardResult<Vec<Company>> {
        Ok(self.companies.snapshot()?)
    }

    pub fn users(&self) -> BoardResult<Vec<User>> {
        Ok(self.users.snapshot()?)
    }

    /// Store staged snapshots; on failure nothing was committed
    async fn write(&self, writes: &[&SnapshotWrite]) -> BoardResult<()> {
        write_snapshots(self.storage.as_ref(), writes).await?;
        Ok(())
    }

    fn publish(&self, event: BoardEvent) {
        self.events.publish(event);
    }

    // ------------------------------------------------------------------
    // Jobs
    // ------------------------------------------------------------------

    pub async fn get_job(&self, id: &str) -> BoardResult<Job> {
        self.jobs
            .get(id)
            .await?
            .ok_or_else(|| EntityError::not_found("job", id).into())
    }

    /// Match a route parameter to a job, tolerating padded and re-cased ids
    pub fn resolve_job(&self, param: &str) -> BoardResult<Option<Job>> {
        let jobs = self.jobs.snapshot()?;
        Ok(find_by_param(&jobs, param).cloned())
    }

    fn ensure_company(&self, company_id: &str) -> BoardResult<()> {
        if self.companies.contains(company_id)? {
            Ok(())
        } else {
            Err(EntityError::not_found("company", company_id).into())
        }
    }

    pub async fn post_job(&self, draft: JobDraft) -> BoardResult<Job> {
        let draft = draft.normalized();
        draft.validate()?;
        let _guard = self.writes.lock().await;
        self.ensure_company(&draft.company_id)?;

        let job = Job::from_draft(draft);
        let (jobs, ()) = Staged::new(&self.jobs, |jobs| {
            jobs.insert(job.id.clone(), job.clone());
        })?;
        self.write(&[&jobs.write]).await?;
        jobs.commit()?;

        info!(job_id = %job.id, title = %job.title, "Job posted");
        self.publish(BoardEvent::created(Job::resource_name(), &job.id));
        Ok(job)
    }

    pub async fn update_job(&self, id: &str, draft: JobDraft) -> BoardResult<Job> {
        let draft = draft.normalized();
        draft.validate()?;
        let _guard = self.writes.lock().await;
        self.ensure_company(&draft.company_id)?;

        let (jobs, updated) = Staged::new(&self.jobs, |jobs| {
            jobs.get_mut(id).map(|job| {
                job.apply_draft(draft);
                job.clone()
            })
        })?;
        let job = updated.ok_or_else(|| EntityError::not_found("job", id))?;
        self.write(&[&jobs.write]).await?;
        jobs.commit()?;

        info!(job_id = %job.id, "Job updated");
        self.publish(BoardEvent::updated(Job::resource_name(), &job.id));
        Ok(job)
    }

    /// Delete a job and every application to it
    pub async fn delete_job(&self, id: &str) -> BoardResult<Job> {
        let _guard = self.writes.lock().await;
        let (jobs, removed) = Staged::new(&self.jobs, |jobs| jobs.shift_remove(id))?;
        let job = removed.ok_or_else(|| EntityError::not_found("job", id))?;
        let (applications, removed) = Staged::new(&self.applications, |applications| {
            take_where(applications, |a| a.job_id == job.id)
        })?;

        self.write(&[&jobs.write, &applications.write]).await?;
        jobs.commit()?;
        applications.commit()?;

        info!(job_id = %job.id, applications = removed.len(), "Job deleted");
        self.publish(BoardEvent::deleted(Job::resource_name(), &job.id));
        for application in &removed {
            self.publish(BoardEvent::deleted(Application::resource_name(), &application.id));
        }
        Ok(job)
    }

    pub async fn set_job_visibility(&self, id: &str, visible: bool) -> BoardResult<Job> {
        let _guard = self.writes.lock().await;
        let (jobs, updated) = Staged::new(&self.jobs, |jobs| {
            jobs.get_mut(id).map(|job| {
                job.visible = visible;
                job.clone()
            })
        })?;
        let job = updated.ok_or_else(|| EntityError::not_found("job", id))?;
        self.write(&[&jobs.write]).await?;
        jobs.commit()?;

        info!(job_id = %job.id, visibility = job.visibility(), "Job visibility changed");
        self.publish(BoardEvent::updated(Job::resource_name(), &job.id));
        Ok(job)
    }

    pub async fn toggle_job_visibility(&self, id: &str) -> BoardResult<Job> {
        let job = self.get_job(id).await?;
        self.set_job_visibility(id, !job.visible).await
    }

    // ------------------------------------------------------------------
    // Applications
    // ------------------------------------------------------------------

    /// Submit an application to a visible job
    ///
    /// One application per email per job.
    pub async fn apply(&self, job_id: &str, draft: ApplicationDraft) -> BoardResult<Application> {
        let draft = draft.normalized();
        draft.validate()?;
        let _guard = self.writes.lock().await;

        let job = self.get_job(job_id).await?;
        if !job.visible {
            return Err(EntityError::Rejected {
                entity_type: "job".to_string(),
                id: job.id,
                action: "apply to".to_string(),
                reason: "job is not open for applications".to_string(),
            }
            .into());
        }

        let duplicate = self
            .applications
            .find(|a| a.job_id == job.id && a.email.eq_ignore_ascii_case(&draft.email))?;
        if duplicate.is_some() {
            return Err(EntityError::AlreadyExists {
                entity_type: "application".to_string(),
                key: "email".to_string(),
                value: draft.email,
            }
            .into());
        }

        let application = Application::from_draft(&job.id, draft);
        let (applications, ()) = Staged::new(&self.applications, |applications| {
            applications.insert(application.id.clone(), application.clone());
        })?;
        self.write(&[&applications.write]).await?;
        applications.commit()?;

        info!(application_id = %application.id, job_id = %job.id, "Application submitted");
        self.publish(BoardEvent::created(Application::resource_name(), &application.id));
        Ok(application)
    }

    pub async fn set_application_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> BoardResult<Application> {
        let _guard = self.writes.lock().await;
        let (applications, updated) = Staged::new(&self.applications, |applications| {
            applications.get_mut(id).map(|a| {
                a.status = status;
                a.clone()
            })
        })?;
        let application = updated.ok_or_else(|| EntityError::not_found("application", id))?;
        self.write(&[&applications.write]).await?;
        applications.commit()?;

        info!(application_id = %application.id, status = %status, "Application status changed");
        self.publish(BoardEvent::updated(Application::resource_name(), &application.id));
        Ok(application)
    }

    /// Withdraw an application that has not been decided yet
    pub async fn withdraw_application(&self, id: &str) -> BoardResult<Application> {
        let _guard = self.writes.lock().await;
        let current = self
            .applications
            .get(id)
            .await?
            .ok_or_else(|| EntityError::not_found("application", id))?;
        if current.status.is_final() {
            return Err(EntityError::Rejected {
                entity_type: "application".to_string(),
                id: current.id,
                action: "withdraw".to_string(),
                reason: format!("application is already {}", current.status),
            }
            .into());
        }

        let (applications, _) =
            Staged::new(&self.applications, |applications| applications.shift_remove(id))?;
        self.write(&[&applications.write]).await?;
        applications.commit()?;

        info!(application_id = %current.id, "Application withdrawn");
        self.publish(BoardEvent::deleted(Application::resource_name(), &current.id));
        Ok(current)
    }

    // ------------------------------------------------------------------
    // Companies
    // ------------------------------------------------------------------

    pub async fn register_company(&self, draft: CompanyDraft) -> BoardResult<Company> {
        let draft = draft.normalized();
        draft.validate()?;
        let _guard = self.writes.lock().await;

        if self
            .companies
            .find(|c| c.email.eq_ignore_ascii_case(&draft.email))?
            .is_some()
        {
            return Err(EntityError::AlreadyExists {
                entity_type: "company".to_string(),
                key: "email".to_string(),
                value: draft.email,
            }
            .into());
        }

        let company = Company::from_draft(draft);
        let (companies, ()) = Staged::new(&self.companies, |companies| {
            companies.insert(company.id.clone(), company.clone());
        })?;
        self.write(&[&companies.write]).await?;
        companies.commit()?;

        info!(company_id = %company.id, name = %company.name, "Company registered");
        self.publish(BoardEvent::created(Company::resource_name(), &company.id));
        Ok(company)
    }

    /// Delete a company, its jobs, and the applications to those jobs
    pub async fn delete_company(&self, id: &str) -> BoardResult<Company> {
        let _guard = self.writes.lock().await;
        let (companies, removed) =
            Staged::new(&self.companies, |companies| companies.shift_remove(id))?;
        let company = removed.ok_or_else(|| EntityError::not_found("company", id))?;

        let (jobs, removed_jobs) = Staged::new(&self.jobs, |jobs| {
            take_where(jobs, |j| j.company_id.as_deref() == Some(company.id.as_str()))
        })?;
        let (applications, removed_applications) =
            Staged::new(&self.applications, |applications| {
                take_where(applications, |a| removed_jobs.iter().any(|j| j.id == a.job_id))
            })?;

        self.write(&[&companies.write, &jobs.write, &applications.write]).await?;
        companies.commit()?;
        jobs.commit()?;
        applications.commit()?;

        info!(
            company_id = %company.id,
            jobs = removed_jobs.len(),
            applications = removed_applications.len(),
            "Company deleted"
        );
        self.publish(BoardEvent::deleted(Company::resource_name(), &company.id));
        for job in &removed_jobs {
            self.publish(BoardEvent::deleted(Job::resource_name(), &job.id));
        }
        for application in &removed_applications {
            self.publish(BoardEvent::deleted(Application::resource_name(), &application.id));
        }
        Ok(company)
    }

    // ------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------

    pub async fn register_user(&self, draft: UserDraft) -> BoardResult<User> {
        let draft = draft.normalized();
        draft.validate()?;
        let _guard = self.writes.lock().await;

        if self
            .users
            .find(|u| u.email.eq_ignore_ascii_case(&draft.email))?
            .is_some()
        {
            return Err(EntityError::AlreadyExists {
                entity_type: "user".to_string(),
                key: "email".to_string(),
                value: draft.email,
            }
            .into());
        }

        let user = User::from_draft(draft);
        let (users, ()) = Staged::new(&self.users, |users| {
            users.insert(user.id.clone(), user.clone());
        })?;
        self.write(&[&users.write]).await?;
        users.commit()?;

        info!(user_id = %user.id, role = user.role.as_str(), "User registered");
        self.publish(BoardEvent::created(User::resource_name(), &user.id));
        Ok(user)
    }

    /// Block or unblock a user
    pub async fn set_user_active(&self, id: &str, active: bool) -> BoardResult<User> {
        let _guard = self.writes.lock().await;
        let (users, updated) = Staged::new(&self.users, |users| {
            users.get_mut(id).map(|u| {
                u.active = active;
                u.clone()
            })
        })?;
        let user = updated.ok_or_else(|| EntityError::not_found("user", id))?;
        self.write(&[&users.write]).await?;
        users.commit()?;

        info!(user_id = %user.id, status = user.status(), "User status changed");
        self.publish(BoardEvent::updated(User::resource_name(), &user.id));
        Ok(user)
    }

    /// Delete a user and the applications they submitted
    pub async fn delete_user(&self, id: &str) -> BoardResult<User> {
        let _guard = self.writes.lock().await;
        let (users, removed) = Staged::new(&self.users, |users| users.shift_remove(id))?;
        let user = removed.ok_or_else(|| EntityError::not_found("user", id))?;
        let (applications, removed) = Staged::new(&self.applications, |applications| {
            take_where(applications, |a| a.user_id.as_deref() == Some(user.id.as_str()))
        })?;

        self.write(&[&users.write, &applications.write]).await?;
        users.commit()?;
        applications.commit()?;

        info!(user_id = %user.id, applications = removed.len(), "User deleted");
        self.publish(BoardEvent::deleted(User::resource_name(), &user.id));
        for application in &removed {
            self.publish(BoardEvent::deleted(Application::resource_name(), &application.id));
        }
        Ok(user)
    }

    // ------------------------------------------------------------------
    // Listing views
    // ------------------------------------------------------------------

    /// Fresh view state sized for `view`
    pub fn new_state(&self, view: ListingView) -> ListingState {
        ListingState::new(view.page_size(&self.config.page_sizes))
    }

    /// Debouncer for a search box, with the configured quiet period
    pub fn search_debouncer(&self) -> (Debouncer<String>, mpsc::UnboundedReceiver<String>) {
        Debouncer::new(self.config.search_debounce())
    }

    /// Public job board; hidden jobs never appear
    pub fn job_listing(&self, query: &ListingQuery) -> BoardResult<ListingPage<Job>> {
        let mut query = query.clone();
        query.selection.set_toggle("visible_only", true);

        let engine =
            listings::job_engine(&self.companies.snapshot()?, &self.applications.snapshot()?);
        Ok(engine.run(&self.jobs.snapshot()?, &query))
    }

    /// Every job, optionally only one company's
    pub fn admin_job_listing(
        &self,
        query: &ListingQuery,
        company_id: Option<&str>,
    ) -> BoardResult<ListingPage<Job>> {
        let jobs = match company_id {
            Some(company_id) => self
                .jobs
                .filter(|j| j.company_id.as_deref() == Some(company_id))?,
            None => self.jobs.snapshot()?,
        };

        let engine =
            listings::job_engine(&self.companies.snapshot()?, &self.applications.snapshot()?);
        Ok(engine.run(&jobs, query))
    }

    /// Applications, optionally only those to one job
    pub fn application_listing(
        &self,
        query: &ListingQuery,
        job_id: Option<&str>,
    ) -> BoardResult<ListingPage<Application>> {
        let applications = match job_id {
            Some(job_id) => self.applications.filter(|a| a.job_id == job_id)?,
            None => self.applications.snapshot()?,
        };

        let engine = listings::application_engine(&self.jobs.snapshot()?);
        Ok(engine.run(&applications, query))
    }

    pub fn company_listing(&self, query: &ListingQuery) -> BoardResult<ListingPage<Company>> {
        let engine = listings::company_engine(&self.jobs.snapshot()?);
        Ok(engine.run(&self.companies.snapshot()?, query))
    }

    pub fn user_listing(&self, query: &ListingQuery) -> BoardResult<ListingPage<User>> {
        let engine =
            listings::user_engine(&self.applications.snapshot()?, &self.jobs.snapshot()?);
        Ok(engine.run(&self.users.snapshot()?, query))
    }

    /// Values present for a job facet on the public board, for filter menus
    pub fn job_facet_options(&self, facet: &str) -> BoardResult<Vec<String>> {
        let jobs = self.jobs.filter(|j| j.visible)?;
        let engine = listings::job_engine(&[], &[]);
        Ok(engine.predicates().facet_options(&jobs, facet))
    }
}

impl std::fmt::Debug for JobBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobBoard")
            .field("config", &self.config)
            .field("jobs", &self.jobs.len().ok())
            .field("applications", &self.applications.len().ok())
            .field("companies", &self.companies.len().ok())
            .field("users", &self.users.len().ok())
            .finish_non_exhaustive()
    }
}
