use axum::extract::State;

use crate::auth::middleware::AuthUser;
use crate::extract::AppQuery;
use crate::response::{ApiResponse, ApiResult};
use crate::saved_jobs::filter::{SavedJobFilter, SavedJobQuery};
use crate::saved_jobs::{self, SavedJobEntry};
use crate::state::AppState;

/// GET /api/saved-jobs
pub async fn handle_list_saved(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppQuery(query): AppQuery<SavedJobQuery>,
) -> ApiResult<Vec<SavedJobEntry>> {
    let filter = SavedJobFilter::from(query);
    let entries = saved_jobs::list_saved(&state, &principal, &filter).await?;
    Ok(ApiResponse::ok("Saved jobs retrieved successfully", entries))
}

/// GET /api/saved-jobs/count
pub async fn handle_count_saved(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<i64> {
    let count = saved_jobs::count_saved(&state, &principal).await?;
    Ok(ApiResponse::ok("Saved jobs count retrieved", count))
}
