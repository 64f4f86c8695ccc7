//! In-memory store implementing every repository trait. Enforces the same
//! unique constraints and cascades as the Postgres schema.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{
    ApplicationRepository, CatalogRepository, JobRepository, ProfileRepository, RepoResult,
    SavedJobRepository, UserRepository,
};
use crate::errors::AppError;
use crate::jobs::search::{contains_ignore_case, JobSearch};
use crate::models::application::{Application, ApplicationStatus, Candidate, NewApplication};
use crate::models::catalog::{JobCompany, JobLocation, LocationField, NewCompany, NewLocation};
use crate::models::job::{JobChanges, JobPost, NewJob, RecruiterJob, SavedJob};
use crate::models::profile::{
    JobSeekerProfile, RecruiterProfile, RecruiterProfileUpdate, SeekerProfileUpdate,
};
use crate::models::user::{NewUser, Role, User, UserType};

#[derive(Debug, Clone)]
struct JobRow {
    id: i32,
    job: NewJob,
}

#[derive(Debug, Clone)]
struct ApplicationRow {
    id: i32,
    seeker_id: i32,
    job_id: i32,
    apply_date: DateTime<Utc>,
    cover_letter: Option<String>,
    status: ApplicationStatus,
    resume_path: Option<String>,
    last_updated: DateTime<Utc>,
    recruiter_notes: Option<String>,
}

#[derive(Debug, Clone)]
struct SaveRow {
    id: i32,
    seeker_id: i32,
    job_id: i32,
    saved_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    next_id: i32,
    users: Vec<User>,
    seekers: HashMap<i32, JobSeekerProfile>,
    recruiters: HashMap<i32, RecruiterProfile>,
    locations: Vec<JobLocation>,
    companies: Vec<JobCompany>,
    jobs: Vec<JobRow>,
    applications: Vec<ApplicationRow>,
    saves: Vec<SaveRow>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn duplicate() -> AppError {
        AppError::Conflict("Record already exists".to_string())
    }

    fn job_post(&self, row: &JobRow) -> Option<JobPost> {
        let poster = self.users.iter().find(|u| u.user_id == row.job.posted_by_id)?;
        let location = row
            .job
            .job_location_id
            .and_then(|id| self.locations.iter().find(|l| l.id == id));
        let company = row
            .job
            .job_company_id
            .and_then(|id| self.companies.iter().find(|c| c.id == id));

        Some(JobPost {
            job_post_id: row.id,
            posted_by_id: row.job.posted_by_id,
            job_title: row.job.job_title.clone(),
            description_of_job: row.job.description_of_job.clone(),
            job_type: row.job.job_type.clone(),
            salary: row.job.salary.clone(),
            remote: row.job.remote.clone(),
            posted_date: row.job.posted_date,
            job_location_id: location.map(|l| l.id),
            location_city: location.map(|l| l.city.clone()),
            location_state: location.map(|l| l.state.clone()),
            location_country: location.map(|l| l.country.clone()),
            job_company_id: company.map(|c| c.id),
            company_name: company.map(|c| c.name.clone()),
            company_website: company.and_then(|c| c.website.clone()),
            poster_first_name: poster.first_name.clone(),
            poster_last_name: poster.last_name.clone(),
            poster_email: poster.email.clone(),
        })
    }

    fn application(&self, row: &ApplicationRow) -> Option<Application> {
        let job = self.jobs.iter().find(|j| j.id == row.job_id)?;
        let post = self.job_post(job)?;
        let user = self.users.iter().find(|u| u.user_id == row.seeker_id)?;
        let profile = self.seekers.get(&row.seeker_id);

        Some(Application {
            id: row.id,
            seeker_id: row.seeker_id,
            job_id: row.job_id,
            apply_date: row.apply_date,
            cover_letter: row.cover_letter.clone(),
            status: row.status,
            resume_path: row.resume_path.clone(),
            last_updated: row.last_updated,
            recruiter_notes: row.recruiter_notes.clone(),
            job_title: post.job_title,
            job_owner_id: post.posted_by_id,
            company_name: post.company_name,
            location_city: post.location_city,
            location_state: post.location_state,
            applicant_first_name: profile
                .and_then(|p| p.first_name.clone())
                .or_else(|| Some(user.first_name.clone())),
            applicant_last_name: profile
                .and_then(|p| p.last_name.clone())
                .or_else(|| Some(user.last_name.clone())),
            applicant_email: user.email.clone(),
        })
    }

    fn applications_where(&self, keep: impl Fn(&Application) -> bool) -> Vec<Application> {
        let mut rows: Vec<Application> = self
            .applications
            .iter()
            .filter_map(|row| self.application(row))
            .filter(|a| keep(a))
            .collect();
        rows.sort_by(|a, b| b.apply_date.cmp(&a.apply_date).then(b.id.cmp(&a.id)));
        rows
    }
}

/// Shared in-memory backing for the HTTP tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Backdates a job's posting time.
    pub fn set_posted_date(&self, job_id: i32, posted_date: DateTime<Utc>) {
        let mut tables = self.tables();
        if let Some(row) = tables.jobs.iter_mut().find(|j| j.id == job_id) {
            row.job.posted_date = posted_date;
        }
    }

    /// Backdates an application.
    pub fn set_apply_date(&self, application_id: i32, apply_date: DateTime<Utc>) {
        let mut tables = self.tables();
        if let Some(row) = tables.applications.iter_mut().find(|a| a.id == application_id) {
            row.apply_date = apply_date;
        }
    }

    pub fn deactivate(&self, user_id: i32) {
        let mut tables = self.tables();
        if let Some(user) = tables.users.iter_mut().find(|u| u.user_id == user_id) {
            user.is_active = false;
        }
    }
}

fn user_type(user_type_id: i32) -> Option<UserType> {
    [Role::Recruiter, Role::JobSeeker]
        .into_iter()
        .find(|role| role.type_id() == user_type_id)
        .map(|role| UserType {
            user_type_id,
            user_type_name: role.type_name().to_string(),
        })
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, user_id: i32) -> RepoResult<Option<User>> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned())
    }

    async fn find_user_type(&self, user_type_id: i32) -> RepoResult<Option<UserType>> {
        Ok(user_type(user_type_id))
    }

    async fn create_with_profile(&self, user: NewUser) -> RepoResult<User> {
        let role = Role::from_type_name(&user.user_type.user_type_name)
            .ok_or_else(|| AppError::Validation("Invalid user type".to_string()))?;
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(Tables::duplicate());
        }

        let user_id = tables.next_id();
        let created = User {
            user_id,
            email: user.email,
            password: user.password_hash,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_active: true,
            registration_date: Utc::now(),
            user_type_id: user.user_type.user_type_id,
            user_type_name: user.user_type.user_type_name,
        };
        tables.users.push(created.clone());

        match role {
            Role::Recruiter => {
                tables.recruiters.insert(
                    user_id,
                    RecruiterProfile {
                        user_account_id: user_id,
                        first_name: Some(user.first_name),
                        last_name: Some(user.last_name),
                        ..Default::default()
                    },
                );
            }
            Role::JobSeeker => {
                tables.seekers.insert(
                    user_id,
                    JobSeekerProfile {
                        user_account_id: user_id,
                        first_name: Some(user.first_name),
                        last_name: Some(user.last_name),
                        ..Default::default()
                    },
                );
            }
        }
        Ok(created)
    }

    async fn update_names(
        &self,
        user_id: i32,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> RepoResult<()> {
        let mut tables = self.tables();
        if let Some(user) = tables.users.iter_mut().find(|u| u.user_id == user_id) {
            if let Some(first) = first_name {
                user.first_name = first;
            }
            if let Some(last) = last_name {
                user.last_name = last;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn seeker_profile(&self, user_id: i32) -> RepoResult<Option<JobSeekerProfile>> {
        Ok(self.tables().seekers.get(&user_id).cloned())
    }

    async fn recruiter_profile(&self, user_id: i32) -> RepoResult<Option<RecruiterProfile>> {
        Ok(self.tables().recruiters.get(&user_id).cloned())
    }

    async fn upsert_seeker(&self, update: SeekerProfileUpdate) -> RepoResult<JobSeekerProfile> {
        let mut tables = self.tables();
        let profile = tables
            .seekers
            .entry(update.user_account_id)
            .or_insert_with(|| JobSeekerProfile {
                user_account_id: update.user_account_id,
                ..Default::default()
            });
        update.apply_to(profile);
        Ok(profile.clone())
    }

    async fn upsert_recruiter(
        &self,
        update: RecruiterProfileUpdate,
    ) -> RepoResult<RecruiterProfile> {
        let mut tables = self.tables();
        let profile = tables
            .recruiters
            .entry(update.user_account_id)
            .or_insert_with(|| RecruiterProfile {
                user_account_id: update.user_account_id,
                ..Default::default()
            });
        update.apply_to(profile);
        Ok(profile.clone())
    }
}

#[async_trait]
impl CatalogRepository for MemoryStore {
    async fn list_locations(&self) -> RepoResult<Vec<JobLocation>> {
        Ok(self.tables().locations.clone())
    }

    async fn location_by_id(&self, id: i32) -> RepoResult<Option<JobLocation>> {
        Ok(self.tables().locations.iter().find(|l| l.id == id).cloned())
    }

    async fn find_location(
        &self,
        city: &str,
        state: &str,
        country: &str,
    ) -> RepoResult<Option<JobLocation>> {
        Ok(self
            .tables()
            .locations
            .iter()
            .find(|l| l.city == city && l.state == state && l.country == country)
            .cloned())
    }

    async fn create_location(&self, location: NewLocation) -> RepoResult<JobLocation> {
        let mut tables = self.tables();
        let exists = tables.locations.iter().any(|l| {
            l.city == location.city && l.state == location.state && l.country == location.country
        });
        if exists {
            return Err(Tables::duplicate());
        }
        let created = JobLocation {
            id: tables.next_id(),
            city: location.city,
            state: location.state,
            country: location.country,
        };
        tables.locations.push(created.clone());
        Ok(created)
    }

    async fn search_locations(
        &self,
        field: LocationField,
        term: &str,
    ) -> RepoResult<Vec<JobLocation>> {
        Ok(self
            .tables()
            .locations
            .iter()
            .filter(|l| contains_ignore_case(field.value(l), term))
            .cloned()
            .collect())
    }

    async fn list_companies(&self) -> RepoResult<Vec<JobCompany>> {
        Ok(self.tables().companies.clone())
    }

    async fn company_by_id(&self, id: i32) -> RepoResult<Option<JobCompany>> {
        Ok(self.tables().companies.iter().find(|c| c.id == id).cloned())
    }

    async fn find_company_by_name(&self, name: &str) -> RepoResult<Option<JobCompany>> {
        Ok(self
            .tables()
            .companies
            .iter()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn create_company(&self, company: NewCompany) -> RepoResult<JobCompany> {
        let mut tables = self.tables();
        if tables.companies.iter().any(|c| c.name == company.name) {
            return Err(Tables::duplicate());
        }
        let created = JobCompany {
            id: tables.next_id(),
            name: company.name,
            logo: company.logo,
            website: company.website,
        };
        tables.companies.push(created.clone());
        Ok(created)
    }

    async fn search_companies(&self, term: &str) -> RepoResult<Vec<JobCompany>> {
        Ok(self
            .tables()
            .companies
            .iter()
            .filter(|c| contains_ignore_case(&c.name, term))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn search(&self, search: &JobSearch) -> RepoResult<Vec<JobPost>> {
        let tables = self.tables();
        let mut jobs: Vec<JobPost> = tables
            .jobs
            .iter()
            .filter_map(|row| tables.job_post(row))
            .filter(|job| search.matches(job))
            .collect();
        jobs.sort_by(|a, b| {
            b.posted_date
                .cmp(&a.posted_date)
                .then(b.job_post_id.cmp(&a.job_post_id))
        });

        Ok(match search.page {
            Some(page) => jobs
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.size as usize)
                .collect(),
            None => jobs,
        })
    }

    async fn find(&self, job_id: i32) -> RepoResult<Option<JobPost>> {
        let tables = self.tables();
        Ok(tables
            .jobs
            .iter()
            .find(|j| j.id == job_id)
            .and_then(|row| tables.job_post(row)))
    }

    async fn create(&self, job: NewJob) -> RepoResult<JobPost> {
        let mut tables = self.tables();
        let row = JobRow {
            id: tables.next_id(),
            job,
        };
        tables.jobs.push(row.clone());
        tables
            .job_post(&row)
            .ok_or_else(|| AppError::NotFound("Poster not found".to_string()))
    }

    async fn update(&self, job_id: i32, changes: JobChanges) -> RepoResult<JobPost> {
        let mut tables = self.tables();
        let row = tables
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
        row.job.job_title = changes.job_title;
        row.job.description_of_job = changes.description_of_job;
        row.job.job_type = changes.job_type;
        row.job.salary = changes.salary;
        row.job.remote = changes.remote;
        if changes.job_location_id.is_some() {
            row.job.job_location_id = changes.job_location_id;
        }
        if changes.job_company_id.is_some() {
            row.job.job_company_id = changes.job_company_id;
        }
        let row = row.clone();
        tables
            .job_post(&row)
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
    }

    async fn delete(&self, job_id: i32) -> RepoResult<()> {
        let mut tables = self.tables();
        tables.jobs.retain(|j| j.id != job_id);
        tables.applications.retain(|a| a.job_id != job_id);
        tables.saves.retain(|s| s.job_id != job_id);
        Ok(())
    }

    async fn by_recruiter(&self, recruiter_id: i32) -> RepoResult<Vec<RecruiterJob>> {
        let tables = self.tables();
        let mut jobs: Vec<RecruiterJob> = tables
            .jobs
            .iter()
            .filter(|row| row.job.posted_by_id == recruiter_id)
            .filter_map(|row| {
                let job = tables.job_post(row)?;
                let total_candidates = tables
                    .applications
                    .iter()
                    .filter(|a| a.job_id == row.id)
                    .count() as i64;
                Some(RecruiterJob {
                    job,
                    total_candidates,
                })
            })
            .collect();
        jobs.sort_by(|a, b| b.job.posted_date.cmp(&a.job.posted_date));
        Ok(jobs)
    }

    async fn candidates(&self, job_id: i32) -> RepoResult<Vec<Candidate>> {
        let tables = self.tables();
        Ok(tables
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .filter_map(|a| {
                let user = tables.users.iter().find(|u| u.user_id == a.seeker_id)?;
                let profile = tables.seekers.get(&a.seeker_id)?;
                Some(Candidate {
                    application_id: a.id,
                    user_id: user.user_id,
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                    email: user.email.clone(),
                    applied_date: a.apply_date,
                    status: a.status,
                    work_authorization: profile.work_authorization.clone(),
                    employment_type: profile.employment_type.clone(),
                    resume: profile.resume.clone(),
                    profile_photo: profile.profile_photo.clone(),
                })
            })
            .collect())
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn exists(&self, seeker_id: i32, job_id: i32) -> RepoResult<bool> {
        Ok(self
            .tables()
            .applications
            .iter()
            .any(|a| a.seeker_id == seeker_id && a.job_id == job_id))
    }

    async fn create(&self, application: NewApplication) -> RepoResult<Application> {
        let mut tables = self.tables();
        let duplicate = tables
            .applications
            .iter()
            .any(|a| a.seeker_id == application.seeker_id && a.job_id == application.job_id);
        if duplicate {
            return Err(Tables::duplicate());
        }
        if !tables.seekers.contains_key(&application.seeker_id) {
            return Err(AppError::NotFound("Job seeker profile not found".to_string()));
        }

        let row = ApplicationRow {
            id: tables.next_id(),
            seeker_id: application.seeker_id,
            job_id: application.job_id,
            apply_date: application.applied_at,
            cover_letter: application.cover_letter,
            status: ApplicationStatus::Applied,
            resume_path: application.resume_path,
            last_updated: application.applied_at,
            recruiter_notes: None,
        };
        tables.applications.push(row.clone());
        tables
            .application(&row)
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
    }

    async fn find(&self, id: i32) -> RepoResult<Option<Application>> {
        let tables = self.tables();
        Ok(tables
            .applications
            .iter()
            .find(|a| a.id == id)
            .and_then(|row| tables.application(row)))
    }

    async fn update_status(
        &self,
        id: i32,
        status: ApplicationStatus,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> RepoResult<Application> {
        let mut tables = self.tables();
        let row = tables
            .applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
        row.status = status;
        if notes.is_some() {
            row.recruiter_notes = notes;
        }
        row.last_updated = at;
        let row = row.clone();
        tables
            .application(&row)
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
    }

    async fn by_seeker(&self, seeker_id: i32) -> RepoResult<Vec<Application>> {
        Ok(self
            .tables()
            .applications_where(|a| a.seeker_id == seeker_id))
    }

    async fn by_job(
        &self,
        job_id: i32,
        status: Option<ApplicationStatus>,
    ) -> RepoResult<Vec<Application>> {
        Ok(self.tables().applications_where(|a| {
            a.job_id == job_id && status.map_or(true, |s| a.status == s)
        }))
    }

    async fn by_recruiter(
        &self,
        recruiter_id: i32,
        status: Option<ApplicationStatus>,
    ) -> RepoResult<Vec<Application>> {
        Ok(self.tables().applications_where(|a| {
            a.job_owner_id == recruiter_id && status.map_or(true, |s| a.status == s)
        }))
    }

    async fn recent_for_recruiter(
        &self,
        recruiter_id: i32,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<Application>> {
        Ok(self
            .tables()
            .applications_where(|a| a.job_owner_id == recruiter_id && a.apply_date >= since))
    }

    async fn status_counts(
        &self,
        recruiter_id: i32,
    ) -> RepoResult<Vec<(ApplicationStatus, i64)>> {
        let mut counts: HashMap<ApplicationStatus, i64> = HashMap::new();
        for application in self
            .tables()
            .applications_where(|a| a.job_owner_id == recruiter_id)
        {
            *counts.entry(application.status).or_default() += 1;
        }
        Ok(counts.into_iter().collect())
    }

    async fn applied_job_ids(&self, seeker_id: i32) -> RepoResult<Vec<i32>> {
        Ok(self
            .tables()
            .applications
            .iter()
            .filter(|a| a.seeker_id == seeker_id)
            .map(|a| a.job_id)
            .collect())
    }
}

#[async_trait]
impl SavedJobRepository for MemoryStore {
    async fn exists(&self, seeker_id: i32, job_id: i32) -> RepoResult<bool> {
        Ok(self
            .tables()
            .saves
            .iter()
            .any(|s| s.seeker_id == seeker_id && s.job_id == job_id))
    }

    async fn save(&self, seeker_id: i32, job_id: i32, at: DateTime<Utc>) -> RepoResult<()> {
        let mut tables = self.tables();
        if tables
            .saves
            .iter()
            .any(|s| s.seeker_id == seeker_id && s.job_id == job_id)
        {
            return Err(Tables::duplicate());
        }
        let id = tables.next_id();
        tables.saves.push(SaveRow {
            id,
            seeker_id,
            job_id,
            saved_at: at,
        });
        Ok(())
    }

    async fn remove(&self, seeker_id: i32, job_id: i32) -> RepoResult<bool> {
        let mut tables = self.tables();
        let before = tables.saves.len();
        tables
            .saves
            .retain(|s| !(s.seeker_id == seeker_id && s.job_id == job_id));
        Ok(tables.saves.len() < before)
    }

    async fn by_seeker(&self, seeker_id: i32) -> RepoResult<Vec<SavedJob>> {
        let tables = self.tables();
        let mut saved: Vec<SavedJob> = tables
            .saves
            .iter()
            .filter(|s| s.seeker_id == seeker_id)
            .filter_map(|s| {
                let row = tables.jobs.iter().find(|j| j.id == s.job_id)?;
                Some(SavedJob {
                    save_id: s.id,
                    seeker_id: s.seeker_id,
                    saved_at: s.saved_at,
                    job: tables.job_post(row)?,
                })
            })
            .collect();
        saved.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(saved)
    }

    async fn count(&self, seeker_id: i32) -> RepoResult<i64> {
        Ok(self
            .tables()
            .saves
            .iter()
            .filter(|s| s.seeker_id == seeker_id)
            .count() as i64)
    }
}
