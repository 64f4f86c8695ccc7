//! Storage seams. Services only talk to these traits; `PgStore` backs them
//! in production and the in-memory store backs the HTTP tests.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::jobs::search::JobSearch;
use crate::models::application::{Application, ApplicationStatus, Candidate, NewApplication};
use crate::models::catalog::{JobCompany, JobLocation, LocationField, NewCompany, NewLocation};
use crate::models::job::{JobChanges, JobPost, NewJob, RecruiterJob, SavedJob};
use crate::models::profile::{
    JobSeekerProfile, RecruiterProfile, RecruiterProfileUpdate, SeekerProfileUpdate,
};
use crate::models::user::{NewUser, User, UserType};

pub type RepoResult<T> = Result<T, AppError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
    async fn find_by_id(&self, user_id: i32) -> RepoResult<Option<User>>;
    async fn find_user_type(&self, user_type_id: i32) -> RepoResult<Option<UserType>>;
    /// Inserts the user and the empty profile row matching its type.
    async fn create_with_profile(&self, user: NewUser) -> RepoResult<User>;
    async fn update_names(
        &self,
        user_id: i32,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> RepoResult<()>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn seeker_profile(&self, user_id: i32) -> RepoResult<Option<JobSeekerProfile>>;
    async fn recruiter_profile(&self, user_id: i32) -> RepoResult<Option<RecruiterProfile>>;
    async fn upsert_seeker(&self, update: SeekerProfileUpdate) -> RepoResult<JobSeekerProfile>;
    async fn upsert_recruiter(
        &self,
        update: RecruiterProfileUpdate,
    ) -> RepoResult<RecruiterProfile>;
}

#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_locations(&self) -> RepoResult<Vec<JobLocation>>;
    async fn location_by_id(&self, id: i32) -> RepoResult<Option<JobLocation>>;
    async fn find_location(
        &self,
        city: &str,
        state: &str,
        country: &str,
    ) -> RepoResult<Option<JobLocation>>;
    async fn create_location(&self, location: NewLocation) -> RepoResult<JobLocation>;
    async fn search_locations(
        &self,
        field: LocationField,
        term: &str,
    ) -> RepoResult<Vec<JobLocation>>;

    async fn list_companies(&self) -> RepoResult<Vec<JobCompany>>;
    async fn company_by_id(&self, id: i32) -> RepoResult<Option<JobCompany>>;
    async fn find_company_by_name(&self, name: &str) -> RepoResult<Option<JobCompany>>;
    async fn create_company(&self, company: NewCompany) -> RepoResult<JobCompany>;
    async fn search_companies(&self, term: &str) -> RepoResult<Vec<JobCompany>>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Matching jobs, newest first, limited to `search.page` when set.
    async fn search(&self, search: &JobSearch) -> RepoResult<Vec<JobPost>>;
    async fn find(&self, job_id: i32) -> RepoResult<Option<JobPost>>;
    async fn create(&self, job: NewJob) -> RepoResult<JobPost>;
    async fn update(&self, job_id: i32, changes: JobChanges) -> RepoResult<JobPost>;
    /// Removes the job together with its applications and saves.
    async fn delete(&self, job_id: i32) -> RepoResult<()>;
    async fn by_recruiter(&self, recruiter_id: i32) -> RepoResult<Vec<RecruiterJob>>;
    async fn candidates(&self, job_id: i32) -> RepoResult<Vec<Candidate>>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn exists(&self, seeker_id: i32, job_id: i32) -> RepoResult<bool>;
    async fn create(&self, application: NewApplication) -> RepoResult<Application>;
    async fn find(&self, id: i32) -> RepoResult<Option<Application>>;
    /// Sets the status and `last_updated`; `notes` replaces the recruiter
    /// notes only when present.
    async fn update_status(
        &self,
        id: i32,
        status: ApplicationStatus,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> RepoResult<Application>;
    async fn by_seeker(&self, seeker_id: i32) -> RepoResult<Vec<Application>>;
    async fn by_job(
        &self,
        job_id: i32,
        status: Option<ApplicationStatus>,
    ) -> RepoResult<Vec<Application>>;
    async fn by_recruiter(
        &self,
        recruiter_id: i32,
        status: Option<ApplicationStatus>,
    ) -> RepoResult<Vec<Application>>;
    async fn recent_for_recruiter(
        &self,
        recruiter_id: i32,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<Application>>;
    /// Non-zero counts only; callers zero-fill.
    async fn status_counts(&self, recruiter_id: i32)
        -> RepoResult<Vec<(ApplicationStatus, i64)>>;
    async fn applied_job_ids(&self, seeker_id: i32) -> RepoResult<Vec<i32>>;
}

#[async_trait]
pub trait SavedJobRepository: Send + Sync {
    async fn exists(&self, seeker_id: i32, job_id: i32) -> RepoResult<bool>;
    async fn save(&self, seeker_id: i32, job_id: i32, at: DateTime<Utc>) -> RepoResult<()>;
    /// Returns false when nothing was saved.
    async fn remove(&self, seeker_id: i32, job_id: i32) -> RepoResult<bool>;
    async fn by_seeker(&self, seeker_id: i32) -> RepoResult<Vec<SavedJob>>;
    async fn count(&self, seeker_id: i32) -> RepoResult<i64>;
}
