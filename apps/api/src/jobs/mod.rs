//! Job posts: public listing and search, recruiter management, and the
//! seeker-side save/apply flags.

pub mod handlers;
pub mod search;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::middleware::Principal;
use crate::errors::AppError;
use crate::jobs::search::JobSearch;
use crate::models::application::Candidate;
use crate::models::catalog::{JobCompany, JobLocation};
use crate::models::job::{JobChanges, JobPost, NewJob, RecruiterJob, JOB_TYPES, REMOTE_OPTIONS};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedBy {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub job_post_id: i32,
    pub job_title: String,
    pub description_of_job: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub remote: Option<String>,
    pub posted_date: DateTime<Utc>,
    pub job_location: Option<String>,
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub posted_by: PostedBy,
    pub posted_by_email: String,
    pub applied: bool,
    pub saved: bool,
}

impl From<JobPost> for JobResponse {
    fn from(job: JobPost) -> Self {
        JobResponse {
            job_location: job.location_label(),
            job_post_id: job.job_post_id,
            job_title: job.job_title,
            description_of_job: job.description_of_job,
            job_type: job.job_type,
            salary: job.salary,
            remote: job.remote,
            posted_date: job.posted_date,
            company_name: job.company_name,
            company_website: job.company_website,
            posted_by_email: job.poster_email.clone(),
            posted_by: PostedBy {
                user_id: job.posted_by_id,
                first_name: job.poster_first_name,
                last_name: job.poster_last_name,
                email: job.poster_email,
            },
            applied: false,
            saved: false,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterJobResponse {
    #[serde(flatten)]
    pub job: JobResponse,
    pub total_candidates: i64,
}

impl From<RecruiterJob> for RecruiterJobResponse {
    fn from(row: RecruiterJob) -> Self {
        RecruiterJobResponse {
            job: JobResponse::from(row.job),
            total_candidates: row.total_candidates,
        }
    }
}

/// Everything the job editor needs to render its selects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFormData {
    pub companies: Vec<JobCompany>,
    pub locations: Vec<JobLocation>,
    pub job_types: Vec<&'static str>,
    pub remote_options: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusFlags {
    pub already_applied: bool,
    pub already_saved: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[validate(length(min = 1, max = 200, message = "Job title is required and must not exceed 200 characters"))]
    pub job_title: String,
    #[validate(length(min = 1, max = 5000, message = "Job description is required and must not exceed 5000 characters"))]
    pub description_of_job: String,
    #[validate(length(min = 1, message = "Job type is required"))]
    pub job_type: String,
    #[validate(length(min = 1, max = 100, message = "Salary is required and must not exceed 100 characters"))]
    pub salary: String,
    #[validate(length(min = 1, message = "Remote option is required"))]
    pub remote: String,
    pub job_location_id: Option<i32>,
    pub job_company_id: Option<i32>,
}

impl JobRequest {
    fn trimmed(mut self) -> Self {
        for field in [
            &mut self.job_title,
            &mut self.description_of_job,
            &mut self.job_type,
            &mut self.salary,
            &mut self.remote,
        ] {
            *field = field.trim().to_string();
        }
        self
    }
}

pub async fn search_jobs(state: &AppState, search: &JobSearch) -> Result<Vec<JobPost>, AppError> {
    let jobs = state.jobs.search(search).await?;
    info!("Job search returned {} results", jobs.len());
    Ok(jobs)
}

/// Sets `applied`/`saved` on each job for a job-seeker principal.
pub async fn with_flags(
    state: &AppState,
    principal: Option<&Principal>,
    jobs: Vec<JobPost>,
) -> Result<Vec<JobResponse>, AppError> {
    let Some(seeker) = principal.filter(|p| p.is_job_seeker()) else {
        return Ok(jobs.into_iter().map(JobResponse::from).collect());
    };

    let applied: HashSet<i32> = state
        .applications
        .applied_job_ids(seeker.user_id)
        .await?
        .into_iter()
        .collect();
    let saved: HashSet<i32> = state
        .saved_jobs
        .by_seeker(seeker.user_id)
        .await?
        .into_iter()
        .map(|s| s.job.job_post_id)
        .collect();

    Ok(jobs
        .into_iter()
        .map(|job| {
            let mut response = JobResponse::from(job);
            response.applied = applied.contains(&response.job_post_id);
            response.saved = saved.contains(&response.job_post_id);
            response
        })
        .collect())
}

pub async fn form_data(state: &AppState, principal: &Principal) -> Result<JobFormData, AppError> {
    principal.require_recruiter("Only recruiters can create jobs")?;
    Ok(JobFormData {
        companies: state.catalog.list_companies().await?,
        locations: state.catalog.list_locations().await?,
        job_types: JOB_TYPES.to_vec(),
        remote_options: REMOTE_OPTIONS.to_vec(),
    })
}

/// Looks up the optional location and company ids; unknown ids are dropped.
async fn resolve_refs(
    state: &AppState,
    location_id: Option<i32>,
    company_id: Option<i32>,
) -> Result<(Option<i32>, Option<i32>), AppError> {
    let location = match location_id {
        Some(id) => match state.catalog.location_by_id(id).await? {
            Some(location) => Some(location.id),
            None => {
                warn!("Ignoring unknown job location id {id}");
                None
            }
        },
        None => None,
    };
    let company = match company_id {
        Some(id) => match state.catalog.company_by_id(id).await? {
            Some(company) => Some(company.id),
            None => {
                warn!("Ignoring unknown job company id {id}");
                None
            }
        },
        None => None,
    };
    Ok((location, company))
}

pub async fn create_job(
    state: &AppState,
    principal: &Principal,
    req: JobRequest,
) -> Result<JobPost, AppError> {
    principal.require_recruiter("Only recruiters can create jobs")?;
    let req = req.trimmed();
    req.validate()?;

    let (job_location_id, job_company_id) =
        resolve_refs(state, req.job_location_id, req.job_company_id).await?;
    let job = state
        .jobs
        .create(NewJob {
            posted_by_id: principal.user_id,
            job_location_id,
            job_company_id,
            job_title: req.job_title,
            description_of_job: Some(req.description_of_job),
            job_type: Some(req.job_type),
            salary: Some(req.salary),
            remote: Some(req.remote),
            posted_date: Utc::now(),
        })
        .await?;

    info!("Recruiter {} created job {}", principal.user_id, job.job_post_id);
    Ok(job)
}

pub async fn find_job(state: &AppState, job_id: i32) -> Result<JobPost, AppError> {
    state
        .jobs
        .find(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
}

/// 404 before 403: a missing job is reported even to non-owners.
async fn owned_job(
    state: &AppState,
    principal: &Principal,
    job_id: i32,
    denied: &str,
) -> Result<JobPost, AppError> {
    let job = find_job(state, job_id).await?;
    if job.posted_by_id != principal.user_id {
        warn!(
            "User {} denied access to job {} owned by {}",
            principal.user_id, job_id, job.posted_by_id
        );
        return Err(AppError::Forbidden(denied.to_string()));
    }
    Ok(job)
}

pub async fn update_job(
    state: &AppState,
    principal: &Principal,
    job_id: i32,
    req: JobRequest,
) -> Result<JobPost, AppError> {
    owned_job(state, principal, job_id, "You don't have permission to edit this job").await?;
    let req = req.trimmed();
    req.validate()?;

    let (job_location_id, job_company_id) =
        resolve_refs(state, req.job_location_id, req.job_company_id).await?;
    let job = state
        .jobs
        .update(
            job_id,
            JobChanges {
                job_title: req.job_title,
                description_of_job: Some(req.description_of_job),
                job_type: Some(req.job_type),
                salary: Some(req.salary),
                remote: Some(req.remote),
                job_location_id,
                job_company_id,
            },
        )
        .await?;
    info!("Job {job_id} updated by {}", principal.user_id);
    Ok(job)
}

pub async fn delete_job(state: &AppState, principal: &Principal, job_id: i32) -> Result<(), AppError> {
    owned_job(state, principal, job_id, "You don't have permission to delete this job").await?;
    state.jobs.delete(job_id).await?;
    info!("Job {job_id} deleted by {}", principal.user_id);
    Ok(())
}

pub async fn recruiter_jobs(
    state: &AppState,
    principal: &Principal,
) -> Result<Vec<RecruiterJobResponse>, AppError> {
    principal.require_recruiter("Only recruiters can view their jobs")?;
    let jobs = state.jobs.by_recruiter(principal.user_id).await?;
    Ok(jobs.into_iter().map(RecruiterJobResponse::from).collect())
}

pub async fn job_detail(
    state: &AppState,
    principal: Option<&Principal>,
    job_id: i32,
) -> Result<JobResponse, AppError> {
    let job = find_job(state, job_id).await?;
    let mut response = JobResponse::from(job);
    let flags = status_flags(state, principal, job_id).await?;
    response.applied = flags.already_applied;
    response.saved = flags.already_saved;
    Ok(response)
}

/// Both flags are false unless the principal is a job seeker.
pub async fn status_flags(
    state: &AppState,
    principal: Option<&Principal>,
    job_id: i32,
) -> Result<JobStatusFlags, AppError> {
    match principal.filter(|p| p.is_job_seeker()) {
        Some(seeker) => Ok(JobStatusFlags {
            already_applied: state.applications.exists(seeker.user_id, job_id).await?,
            already_saved: state.saved_jobs.exists(seeker.user_id, job_id).await?,
        }),
        None => Ok(JobStatusFlags::default()),
    }
}

pub async fn candidates(
    state: &AppState,
    principal: &Principal,
    job_id: i32,
) -> Result<Vec<Candidate>, AppError> {
    owned_job(
        state,
        principal,
        job_id,
        "You don't have permission to view candidates for this job",
    )
    .await?;
    state.jobs.candidates(job_id).await
}

pub async fn save_job(state: &AppState, principal: &Principal, job_id: i32) -> Result<(), AppError> {
    find_job(state, job_id).await?;
    principal.require_job_seeker("Only job seekers can save jobs")?;
    if state.saved_jobs.exists(principal.user_id, job_id).await? {
        return Err(AppError::Conflict("Job is already saved".to_string()));
    }
    state
        .saved_jobs
        .save(principal.user_id, job_id, Utc::now())
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict("Job is already saved".to_string()),
            other => other,
        })?;
    info!("User {} saved job {job_id}", principal.user_id);
    Ok(())
}

pub async fn unsave_job(state: &AppState, principal: &Principal, job_id: i32) -> Result<(), AppError> {
    principal.require_job_seeker("Only job seekers can unsave jobs")?;
    if !state.saved_jobs.remove(principal.user_id, job_id).await? {
        return Err(AppError::NotFound("Saved job not found".to_string()));
    }
    info!("User {} unsaved job {job_id}", principal.user_id);
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use super::*;
    use crate::auth::service::{register, RegisterRequest};
    use crate::models::user::Role;
    use crate::state::test_support::TestContext;

    pub async fn principal(ctx: &TestContext, email: &str, role: Role) -> Principal {
        let user = register(
            &ctx.state,
            RegisterRequest {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                email: email.to_string(),
                password: "secret123".to_string(),
                user_type_id: Some(role.type_id()),
            },
        )
        .await
        .unwrap();
        Principal {
            user_id: user.user_id,
            email: user.email,
            role,
        }
    }

    pub fn job_request(title: &str) -> JobRequest {
        JobRequest {
            job_title: title.to_string(),
            description_of_job: "Build things".to_string(),
            job_type: "Full-Time".to_string(),
            salary: "100k".to_string(),
            remote: "Remote-Only".to_string(),
            job_location_id: None,
            job_company_id: None,
        }
    }

    pub async fn posted_job(ctx: &TestContext, recruiter: &Principal, title: &str) -> JobPost {
        create_job(&ctx.state, recruiter, job_request(title))
            .await
            .unwrap()
    }
}
