//! Job applications: the seeker side (apply, withdraw, list) and the
//! recruiter side (review pipeline, statistics).

pub mod handlers;
pub mod status;

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::middleware::Principal;
use crate::errors::AppError;
use crate::jobs;
use crate::models::application::{Application, ApplicationStatus, NewApplication};
use crate::state::AppState;

/// Window for the recruiter's "recent applications" list.
pub const RECENT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub cover_letter: Option<String>,
    pub resume_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub status: String,
    pub recruiter_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: i32,
    pub job_id: i32,
    pub job_title: String,
    pub company_name: String,
    pub job_location: Option<String>,
    pub applicant_name: String,
    pub applicant_email: String,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub apply_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    pub recruiter_notes: Option<String>,
    pub resume_path: Option<String>,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        ApplicationResponse {
            applicant_name: app.applicant_name(),
            job_location: app.location_label(),
            id: app.id,
            job_id: app.job_id,
            job_title: app.job_title,
            company_name: app.company_name.unwrap_or_else(|| "Company".to_string()),
            applicant_email: app.applicant_email,
            cover_letter: app.cover_letter,
            status: app.status,
            apply_date: app.apply_date,
            last_updated: app.last_updated,
            recruiter_notes: app.recruiter_notes,
            resume_path: app.resume_path,
        }
    }
}

fn responses(apps: Vec<Application>) -> Vec<ApplicationResponse> {
    apps.into_iter().map(ApplicationResponse::from).collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Blank means no filter; anything else must name a status.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<ApplicationStatus>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(name) => ApplicationStatus::parse(name)
            .map(Some)
            .ok_or_else(|| AppError::Validation(format!("Invalid status: {name}"))),
    }
}

async fn find_application(state: &AppState, id: i32) -> Result<Application, AppError> {
    state
        .applications
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
}

pub async fn apply(
    state: &AppState,
    principal: &Principal,
    job_id: i32,
    req: ApplyRequest,
) -> Result<ApplicationResponse, AppError> {
    jobs::find_job(state, job_id).await?;
    principal.require_job_seeker("Only job seekers can apply for jobs")?;

    let duplicate = || AppError::Conflict("You have already applied for this job".to_string());
    if state.applications.exists(principal.user_id, job_id).await? {
        return Err(duplicate());
    }
    let application = state
        .applications
        .create(NewApplication {
            seeker_id: principal.user_id,
            job_id,
            cover_letter: non_blank(req.cover_letter),
            resume_path: non_blank(req.resume_path),
            applied_at: Utc::now(),
        })
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => duplicate(),
            other => other,
        })?;

    info!(
        "User {} applied for job {job_id} (application {})",
        principal.user_id, application.id
    );
    Ok(application.into())
}

pub async fn withdraw(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> Result<ApplicationResponse, AppError> {
    principal.require_job_seeker("Only job seekers can withdraw applications")?;
    let application = find_application(state, id).await?;
    if application.seeker_id != principal.user_id {
        return Err(AppError::Forbidden(
            "Application does not belong to this user".to_string(),
        ));
    }
    if !application.status.can_withdraw() {
        return Err(AppError::Conflict(format!(
            "Application cannot be withdrawn in current status: {}",
            application.status.name()
        )));
    }

    let updated = state
        .applications
        .update_status(id, ApplicationStatus::Withdrawn, None, Utc::now())
        .await?;
    info!("Application {id} withdrawn by user {}", principal.user_id);
    Ok(updated.into())
}

pub async fn update_status(
    state: &AppState,
    principal: &Principal,
    id: i32,
    req: StatusUpdateRequest,
) -> Result<ApplicationResponse, AppError> {
    principal.require_recruiter("Only recruiters can update application status")?;
    let next = ApplicationStatus::parse(&req.status)
        .ok_or_else(|| AppError::Validation(format!("Invalid status: {}", req.status.trim())))?;
    let application = find_application(state, id).await?;
    if application.job_owner_id != principal.user_id {
        return Err(AppError::Forbidden(
            "You can only update applications for your own jobs".to_string(),
        ));
    }

    if let Some(unusual) = status::classify(application.status, next) {
        warn!(
            "Application {id}: {} -> {} {}",
            application.status.name(),
            next.name(),
            unusual.describe()
        );
    }
    let updated = state
        .applications
        .update_status(id, next, non_blank(req.recruiter_notes), Utc::now())
        .await?;
    info!(
        "Application {id} status set to {} by recruiter {}",
        next.name(),
        principal.user_id
    );
    Ok(updated.into())
}

pub async fn my_applications(
    state: &AppState,
    principal: &Principal,
) -> Result<Vec<ApplicationResponse>, AppError> {
    principal.require_job_seeker("Only job seekers can view applications")?;
    Ok(responses(state.applications.by_seeker(principal.user_id).await?))
}

/// False for anyone but a job seeker; 404 when the job does not exist.
pub async fn has_applied(
    state: &AppState,
    principal: &Principal,
    job_id: i32,
) -> Result<bool, AppError> {
    jobs::find_job(state, job_id).await?;
    if !principal.is_job_seeker() {
        return Ok(false);
    }
    state.applications.exists(principal.user_id, job_id).await
}

pub async fn job_applications(
    state: &AppState,
    principal: &Principal,
    job_id: i32,
    status: Option<ApplicationStatus>,
) -> Result<Vec<ApplicationResponse>, AppError> {
    principal.require_recruiter("Only recruiters can view job applications")?;
    let job = jobs::find_job(state, job_id).await?;
    if job.posted_by_id != principal.user_id {
        return Err(AppError::Forbidden(
            "You can only view applications for your own jobs".to_string(),
        ));
    }
    Ok(responses(state.applications.by_job(job_id, status).await?))
}

pub async fn recruiter_applications(
    state: &AppState,
    principal: &Principal,
    status: Option<ApplicationStatus>,
) -> Result<Vec<ApplicationResponse>, AppError> {
    principal.require_recruiter("Only recruiters can view applications")?;
    Ok(responses(
        state
            .applications
            .by_recruiter(principal.user_id, status)
            .await?,
    ))
}

pub async fn recent_applications(
    state: &AppState,
    principal: &Principal,
    now: DateTime<Utc>,
) -> Result<Vec<ApplicationResponse>, AppError> {
    principal.require_recruiter("Only recruiters can view applications")?;
    let since = now - Duration::days(RECENT_WINDOW_DAYS);
    Ok(responses(
        state
            .applications
            .recent_for_recruiter(principal.user_id, since)
            .await?,
    ))
}

/// Count per status name, zero-filled, plus `totalApplications`.
pub async fn statistics(
    state: &AppState,
    principal: &Principal,
) -> Result<BTreeMap<String, i64>, AppError> {
    principal.require_recruiter("Only recruiters can view statistics")?;
    let mut stats: BTreeMap<String, i64> = ApplicationStatus::ALL
        .iter()
        .map(|s| (s.name().to_string(), 0))
        .collect();
    let mut total = 0;
    for (status, count) in state.applications.status_counts(principal.user_id).await? {
        stats.insert(status.name().to_string(), count);
        total += count;
    }
    stats.insert("totalApplications".to_string(), total);
    Ok(stats)
}

/// Visible to the applicant and to the recruiter who owns the job.
pub async fn get_application(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> Result<ApplicationResponse, AppError> {
    let application = find_application(state, id).await?;
    let is_owner = application.seeker_id == principal.user_id;
    let is_recruiter = application.job_owner_id == principal.user_id;
    if !is_owner && !is_recruiter {
        return Err(AppError::Forbidden(
            "You don't have permission to view this application".to_string(),
        ));
    }
    Ok(application.into())
}

pub fn status_names() -> BTreeMap<&'static str, &'static str> {
    ApplicationStatus::ALL
        .iter()
        .map(|s| (s.name(), s.display_name()))
        .collect()
}
