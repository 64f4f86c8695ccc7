use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};

use crate::auth::middleware::AuthUser;
use crate::errors::AppError;
use crate::extract::{AppMultipart, AppPath};
use crate::profiles::upload::ProfileForm;
use crate::profiles::{self, UserProfile};
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<UserProfile> {
    let profile = profiles::get_profile(&state, &principal).await?;
    Ok(ApiResponse::ok("Profile retrieved successfully", profile))
}

/// PUT /api/job-seeker
pub async fn handle_update_seeker(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppMultipart(multipart): AppMultipart,
) -> ApiResult<UserProfile> {
    let form = ProfileForm::read(multipart, state.config.max_upload_bytes).await?;
    let profile = profiles::update_seeker(&state, &principal, form).await?;
    Ok(ApiResponse::ok("Profile updated successfully", profile))
}

/// PUT /api/recruiter
pub async fn handle_update_recruiter(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    AppMultipart(multipart): AppMultipart,
) -> ApiResult<UserProfile> {
    let form = ProfileForm::read(multipart, state.config.max_upload_bytes).await?;
    let profile = profiles::update_recruiter(&state, &principal, form).await?;
    Ok(ApiResponse::ok("Profile updated successfully", profile))
}

/// GET /api/download/:file_type/:file_name
pub async fn handle_download_path(
    AuthUser(principal): AuthUser,
    AppPath((_file_type, file_name)): AppPath<(String, String)>,
) -> ApiResult<String> {
    let path = profiles::download_path(&principal, &file_name)?;
    Ok(ApiResponse::ok("File URL generated", path))
}

/// GET /photos/*key
pub async fn handle_fetch_upload(
    State(state): State<AppState>,
    _user: AuthUser,
    AppPath(key): AppPath<String>,
) -> Result<Response, AppError> {
    let file = profiles::fetch_upload(&state, &key).await?;
    let content_type = file
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));
    Ok(([(header::CONTENT_TYPE, content_type)], file.bytes).into_response())
}
