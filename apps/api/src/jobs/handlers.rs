use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::applications::{self, ApplyRequest};
use crate::auth::middleware::{AuthUser, MaybeUser};
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::jobs::search::{JobSearch, JobSearchQuery};
use crate::jobs::{
    self, JobFormData, JobRequest, JobResponse, JobStatusFlags, RecruiterJobResponse,
};
use crate::models::application::Candidate;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

async fn listing(
    state: &AppState,
    user: MaybeUser,
    query: JobSearchQuery,
) -> Result<Vec<JobResponse>, AppError> {
    let search = JobSearch::from_query(query, Utc::now());
    let found = jobs::search_jobs(state, &search).await?;
    jobs::with_flags(state, user.0.as_ref(), found).await
}

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    user: MaybeUser,
    AppQuery(query): AppQuery<JobSearchQuery>,
) -> ApiResult<Vec<JobResponse>> {
    let jobs = listing(&state, user, query).await?;
    Ok(ApiResponse::ok("Jobs retrieved successfully", jobs))
}

/// GET /api/jobs/search
pub async fn handle_search_jobs(
    State(state): State<AppState>,
    user: MaybeUser,
    AppQuery(query): AppQuery<JobSearchQuery>,
) -> ApiResult<Vec<JobResponse>> {
    let jobs = listing(&state, user, query).await?;
    Ok(ApiResponse::ok("Search completed successfully", jobs))
}

/// GET /api/jobs/create
pub async fn handle_form_data(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<JobFormData> {
    let data = jobs::form_data(&state, &principal).await?;
    Ok(ApiResponse::ok("Create job form data retrieved", data))
}

/// POST /api/jobs
/// POST /api/jobs/create
pub async fn handle_create_job(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppJson(req): AppJson<JobRequest>,
) -> Result<(StatusCode, Json<ApiResponse<JobResponse>>), AppError> {
    let job = jobs::create_job(&state, &principal, req).await?;
    Ok(ApiResponse::created(
        "Job created successfully",
        JobResponse::from(job),
    ))
}

/// GET /api/jobs/recruiter
pub async fn handle_recruiter_jobs(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Vec<RecruiterJobResponse>> {
    let jobs = jobs::recruiter_jobs(&state, &principal).await?;
    Ok(ApiResponse::ok("Recruiter jobs retrieved successfully", jobs))
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    user: MaybeUser,
    AppPath(job_id): AppPath<i32>,
) -> ApiResult<JobResponse> {
    let job = jobs::job_detail(&state, user.0.as_ref(), job_id).await?;
    Ok(ApiResponse::ok("Job retrieved successfully", job))
}

/// GET /api/jobs/:id/status
pub async fn handle_job_status(
    State(state): State<AppState>,
    user: MaybeUser,
    AppPath(job_id): AppPath<i32>,
) -> ApiResult<JobStatusFlags> {
    let flags = jobs::status_flags(&state, user.0.as_ref(), job_id).await?;
    Ok(ApiResponse::ok("Job status retrieved", flags))
}

/// GET /api/jobs/:id/candidates
pub async fn handle_candidates(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(job_id): AppPath<i32>,
) -> ApiResult<Vec<Candidate>> {
    let candidates = jobs::candidates(&state, &principal, job_id).await?;
    Ok(ApiResponse::ok("Candidates retrieved successfully", candidates))
}

/// PUT /api/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(job_id): AppPath<i32>,
    AppJson(req): AppJson<JobRequest>,
) -> ApiResult<JobResponse> {
    let job = jobs::update_job(&state, &principal, job_id, req).await?;
    Ok(ApiResponse::ok("Job updated successfully", JobResponse::from(job)))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(job_id): AppPath<i32>,
) -> ApiResult<()> {
    jobs::delete_job(&state, &principal, job_id).await?;
    Ok(ApiResponse::empty("Job deleted successfully"))
}

/// POST /api/jobs/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(job_id): AppPath<i32>,
    body: Option<AppJson<ApplyRequest>>,
) -> ApiResult<()> {
    let req = body.map(|AppJson(req)| req).unwrap_or_default();
    applications::apply(&state, &principal, job_id, req).await?;
    Ok(ApiResponse::empty("Application submitted successfully"))
}

/// POST /api/jobs/:id/save
pub async fn handle_save(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(job_id): AppPath<i32>,
) -> ApiResult<()> {
    jobs::save_job(&state, &principal, job_id).await?;
    Ok(ApiResponse::empty("Job saved successfully"))
}

/// DELETE /api/jobs/:id/unsave
pub async fn handle_unsave(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(job_id): AppPath<i32>,
) -> ApiResult<()> {
    jobs::unsave_job(&state, &principal, job_id).await?;
    Ok(ApiResponse::empty("Job unsaved successfully"))
}
