use std::collections::BTreeMap;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::applications::{
    self, parse_status_filter, ApplicationResponse, ApplyRequest, StatusUpdateRequest,
};
use crate::auth::middleware::AuthUser;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFlag {
    pub has_applied: bool,
}

/// POST /api/applications/job/:job_id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(job_id): AppPath<i32>,
    body: Option<AppJson<ApplyRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<ApplicationResponse>>), AppError> {
    let req = body.map(|AppJson(req)| req).unwrap_or_default();
    let application = applications::apply(&state, &principal, job_id, req).await?;
    Ok(ApiResponse::created(
        "Application submitted successfully",
        application,
    ))
}

/// GET /api/applications/my-applications
pub async fn handle_my_applications(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Vec<ApplicationResponse>> {
    let apps = applications::my_applications(&state, &principal).await?;
    Ok(ApiResponse::ok("Applications retrieved successfully", apps))
}

/// PUT /api/applications/:id/withdraw
pub async fn handle_withdraw(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(id): AppPath<i32>,
) -> ApiResult<ApplicationResponse> {
    let app = applications::withdraw(&state, &principal, id).await?;
    Ok(ApiResponse::ok("Application withdrawn successfully", app))
}

/// GET /api/applications/job/:job_id/status
pub async fn handle_applied_status(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(job_id): AppPath<i32>,
) -> ApiResult<AppliedFlag> {
    let has_applied = applications::has_applied(&state, &principal, job_id).await?;
    Ok(ApiResponse::ok(
        "Application status retrieved",
        AppliedFlag { has_applied },
    ))
}

/// GET /api/applications/recruiter/applications
pub async fn handle_recruiter_applications(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppQuery(filter): AppQuery<StatusFilter>,
) -> ApiResult<Vec<ApplicationResponse>> {
    let status = parse_status_filter(filter.status.as_deref())?;
    let apps = applications::recruiter_applications(&state, &principal, status).await?;
    Ok(ApiResponse::ok("Applications retrieved successfully", apps))
}

/// GET /api/applications/job/:job_id/applications
pub async fn handle_job_applications(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(job_id): AppPath<i32>,
    AppQuery(filter): AppQuery<StatusFilter>,
) -> ApiResult<Vec<ApplicationResponse>> {
    let status = parse_status_filter(filter.status.as_deref())?;
    let apps = applications::job_applications(&state, &principal, job_id, status).await?;
    Ok(ApiResponse::ok("Applications retrieved successfully", apps))
}

/// PUT /api/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(id): AppPath<i32>,
    AppJson(req): AppJson<StatusUpdateRequest>,
) -> ApiResult<ApplicationResponse> {
    let app = applications::update_status(&state, &principal, id, req).await?;
    Ok(ApiResponse::ok("Application status updated successfully", app))
}

/// GET /api/applications/recruiter/statistics
pub async fn handle_statistics(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<BTreeMap<String, i64>> {
    let stats = applications::statistics(&state, &principal).await?;
    Ok(ApiResponse::ok("Statistics retrieved successfully", stats))
}

/// GET /api/applications/recruiter/recent
pub async fn handle_recent(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Vec<ApplicationResponse>> {
    let apps = applications::recent_applications(&state, &principal, Utc::now()).await?;
    Ok(ApiResponse::ok("Recent applications retrieved successfully", apps))
}

/// GET /api/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppPath(id): AppPath<i32>,
) -> ApiResult<ApplicationResponse> {
    let app = applications::get_application(&state, &principal, id).await?;
    Ok(ApiResponse::ok("Application retrieved successfully", app))
}

/// GET /api/applications/statuses
pub async fn handle_statuses(
    _user: AuthUser,
) -> ApiResult<BTreeMap<&'static str, &'static str>> {
    Ok(ApiResponse::ok(
        "Application statuses retrieved",
        applications::status_names(),
    ))
}
