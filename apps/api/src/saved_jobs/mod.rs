//! A job seeker's saved jobs with filtering, sorting and pagination.

pub mod filter;
pub mod handlers;

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::middleware::Principal;
use crate::errors::AppError;
use crate::jobs::JobResponse;
use crate::saved_jobs::filter::SavedJobFilter;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobEntry {
    /// Same as the job's `jobPostId`.
    pub id: i32,
    #[serde(flatten)]
    pub job: JobResponse,
    pub saved_at: DateTime<Utc>,
    pub is_saved: bool,
    pub is_applied: bool,
}

pub async fn list_saved(
    state: &AppState,
    principal: &Principal,
    filter: &SavedJobFilter,
) -> Result<Vec<SavedJobEntry>, AppError> {
    principal.require_job_seeker("Only job seekers can access saved jobs")?;

    let applied: HashSet<i32> = state
        .applications
        .applied_job_ids(principal.user_id)
        .await?
        .into_iter()
        .collect();
    let entries = state
        .saved_jobs
        .by_seeker(principal.user_id)
        .await?
        .into_iter()
        .map(|saved| {
            let is_applied = applied.contains(&saved.job.job_post_id);
            let mut job = JobResponse::from(saved.job);
            job.saved = true;
            job.applied = is_applied;
            SavedJobEntry {
                id: job.job_post_id,
                job,
                saved_at: saved.saved_at,
                is_saved: true,
                is_applied,
            }
        })
        .collect();

    Ok(filter.apply(entries))
}

pub async fn count_saved(state: &AppState, principal: &Principal) -> Result<i64, AppError> {
    principal.require_job_seeker("Only job seekers can access saved jobs count")?;
    state.saved_jobs.count(principal.user_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applications::{self, ApplyRequest};
    use crate::jobs::test_fixtures::{posted_job, principal};
    use crate::jobs::save_job;
    use crate::models::user::Role;
    use crate::saved_jobs::filter::SavedJobQuery;
    use crate::state::test_support::test_context;

    #[tokio::test]
    async fn test_entries_carry_applied_flag() {
        let ctx = test_context();
        let recruiter = principal(&ctx, "rec@example.com", Role::Recruiter).await;
        let seeker = principal(&ctx, "seeker@example.com", Role::JobSeeker).await;
        let first = posted_job(&ctx, &recruiter, "First").await;
        let second = posted_job(&ctx, &recruiter, "Second").await;
        save_job(&ctx.state, &seeker, first.job_post_id).await.unwrap();
        save_job(&ctx.state, &seeker, second.job_post_id).await.unwrap();
        applications::apply(&ctx.state, &seeker, second.job_post_id, ApplyRequest::default())
            .await
            .unwrap();

        let filter = SavedJobFilter::from(SavedJobQuery {
            applied: Some("true".to_string()),
            ..Default::default()
        });
        let entries = list_saved(&ctx.state, &seeker, &filter).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, second.job_post_id);
        assert!(entries[0].is_saved && entries[0].is_applied);

        assert_eq!(count_saved(&ctx.state, &seeker).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_recruiters_have_no_saved_jobs() {
        let ctx = test_context();
        let recruiter = principal(&ctx, "rec@example.com", Role::Recruiter).await;
        let filter = SavedJobFilter::from(SavedJobQuery::default());
        assert!(matches!(
            list_saved(&ctx.state, &recruiter, &filter).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            count_saved(&ctx.state, &recruiter).await,
            Err(AppError::Forbidden(_))
        ));
    }
}
