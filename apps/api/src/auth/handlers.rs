use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::NaiveDate;
use serde::Serialize;

use crate::auth::middleware::{token_from_headers, AuthUser, SESSION_COOKIE};
use crate::auth::service::{self, JwtResponse, LoginRequest, RegisterRequest};
use crate::errors::AppError;
use crate::extract::AppJson;
use crate::models::user::User;
use crate::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_type: String,
    pub registration_date: NaiveDate,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        CurrentUser {
            user_id: user.user_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            user_type: user.user_type_name.clone(),
            registration_date: user.registration_date.date_naive(),
        }
    }
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session_cookie_secure)
        .build()
}

/// POST /api/auth/register
/// POST /api/register/new
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<JwtResponse>>), AppError> {
    let user = service::register(&state, req).await?;
    let body = service::jwt_response(&state, &user)?;
    Ok(ApiResponse::created("Registration successful", body))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<JwtResponse>>), AppError> {
    let user = service::login(&state, req).await?;
    let body = service::jwt_response(&state, &user)?;
    let jar = jar.add(session_cookie(&state, body.token.clone()));
    Ok((jar, ApiResponse::ok("Login successful", body)))
}

/// POST /api/auth/logout
pub async fn handle_logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse<()>>) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, ApiResponse::empty("Logout successful"))
}

/// GET /api/auth/user
pub async fn handle_current_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<CurrentUser> {
    let user = state
        .users
        .find_by_id(principal.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;
    Ok(ApiResponse::ok("User profile retrieved", CurrentUser::from(&user)))
}

/// GET /api/auth/verify
/// POST /api/auth/verify
pub async fn handle_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<ApiResponse<bool>> {
    let valid = token_from_headers(&headers)
        .map(|token| state.tokens.is_valid(&token))
        .unwrap_or(false);
    ApiResponse::ok("Token validation result", valid)
}
