pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::applications::handlers as applications;
use crate::auth::handlers as auth;
use crate::auth::middleware::authenticate;
use crate::catalog::handlers as catalog;
use crate::jobs::handlers as jobs;
use crate::profiles::handlers as profiles;
use crate::saved_jobs::handlers as saved_jobs;
use crate::state::AppState;

/// Room for multipart framing and text fields on top of two files.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::handle_register))
        .route("/register/new", post(auth::handle_register))
        .route("/auth/login", post(auth::handle_login))
        .route("/auth/logout", post(auth::handle_logout))
        .route("/auth/user", get(auth::handle_current_user))
        .route(
            "/auth/verify",
            get(auth::handle_verify).post(auth::handle_verify),
        )
}

fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(jobs::handle_list_jobs).post(jobs::handle_create_job))
        .route("/jobs/search", get(jobs::handle_search_jobs))
        .route(
            "/jobs/create",
            get(jobs::handle_form_data).post(jobs::handle_create_job),
        )
        .route("/jobs/recruiter", get(jobs::handle_recruiter_jobs))
        .route(
            "/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        .route("/jobs/:id/status", get(jobs::handle_job_status))
        .route("/jobs/:id/candidates", get(jobs::handle_candidates))
        .route("/jobs/:id/apply", post(jobs::handle_apply))
        .route("/jobs/:id/save", post(jobs::handle_save))
        .route("/jobs/:id/unsave", delete(jobs::handle_unsave))
}

fn application_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/applications/job/:job_id/apply",
            post(applications::handle_apply),
        )
        .route(
            "/applications/job/:job_id/status",
            get(applications::handle_applied_status),
        )
        .route(
            "/applications/job/:job_id/applications",
            get(applications::handle_job_applications),
        )
        .route(
            "/applications/my-applications",
            get(applications::handle_my_applications),
        )
        .route(
            "/applications/recruiter/applications",
            get(applications::handle_recruiter_applications),
        )
        .route(
            "/applications/recruiter/statistics",
            get(applications::handle_statistics),
        )
        .route(
            "/applications/recruiter/recent",
            get(applications::handle_recent),
        )
        .route("/applications/statuses", get(applications::handle_statuses))
        .route(
            "/applications/:id",
            get(applications::handle_get_application),
        )
        .route(
            "/applications/:id/withdraw",
            put(applications::handle_withdraw),
        )
        .route(
            "/applications/:id/status",
            put(applications::handle_update_status),
        )
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/saved-jobs", get(saved_jobs::handle_list_saved))
        .route("/saved-jobs/count", get(saved_jobs::handle_count_saved))
        .route("/profile", get(profiles::handle_get_profile))
        .route("/job-seeker", put(profiles::handle_update_seeker))
        .route("/recruiter", put(profiles::handle_update_recruiter))
        .route(
            "/download/:file_type/:file_name",
            get(profiles::handle_download_path),
        )
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/locations",
            get(catalog::handle_list_locations).post(catalog::handle_create_location),
        )
        .route("/locations/search", get(catalog::handle_search_locations))
        .route(
            "/companies",
            get(catalog::handle_list_companies).post(catalog::handle_create_company),
        )
        .route("/companies/search", get(catalog::handle_search_companies))
}

/// The full application router. The auth middleware only attaches the
/// principal; each handler decides whether it needs one.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes * 2 + MULTIPART_OVERHEAD;
    let api = Router::new()
        .merge(auth_routes())
        .merge(job_routes())
        .merge(application_routes())
        .merge(profile_routes())
        .merge(catalog_routes());

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api", api)
        .route("/photos/*key", get(profiles::handle_fetch_upload))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}
