use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::password;
use crate::errors::AppError;
use crate::models::user::{NewUser, User};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "First name is required and must not exceed 50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "Last name is required and must not exceed 50 characters"))]
    pub last_name: String,
    #[validate(
        email(message = "Please provide a valid email"),
        length(max = 100, message = "Email must not exceed 100 characters")
    )]
    pub email: String,
    #[validate(length(min = 6, max = 100, message = "Password must be between 6 and 100 characters"))]
    pub password: String,
    pub user_type_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtResponse {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: &'static str,
    pub user_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Creates the account and its empty role profile.
pub async fn register(state: &AppState, mut req: RegisterRequest) -> Result<User, AppError> {
    req.first_name = req.first_name.trim().to_string();
    req.last_name = req.last_name.trim().to_string();
    req.email = req.email.trim().to_string();
    req.validate()?;

    let user_type_id = req
        .user_type_id
        .ok_or_else(|| AppError::Validation("User type is required".to_string()))?;

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    let user_type = state
        .users
        .find_user_type(user_type_id)
        .await?
        .ok_or_else(|| AppError::Validation("Invalid user type".to_string()))?;

    let user = state
        .users
        .create_with_profile(NewUser {
            email: req.email,
            password_hash: password::hash(&req.password)?,
            first_name: req.first_name,
            last_name: req.last_name,
            user_type,
        })
        .await
        .map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict("Email already registered".to_string()),
            other => other,
        })?;

    info!("Registered user {} as {}", user.email, user.user_type_name);
    Ok(user)
}

/// Unknown email, wrong password and inactive accounts all fail the same way.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<User, AppError> {
    req.validate()?;
    let email = req.email.trim();

    let Some(user) = state.users.find_by_email(email).await? else {
        warn!("Login failed for unknown email {email}");
        return Err(AppError::InvalidCredentials);
    };
    if !password::verify(&req.password, &user.password) {
        warn!("Login failed for {email}: bad password");
        return Err(AppError::InvalidCredentials);
    }
    if !user.is_active {
        warn!("Login refused for inactive user {email}");
        return Err(AppError::InvalidCredentials);
    }

    info!("Login successful for user {}", user.email);
    Ok(user)
}

pub fn jwt_response(state: &AppState, user: &User) -> Result<JwtResponse, AppError> {
    let role = user
        .role()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("user {} has no role", user.user_id)))?;
    Ok(JwtResponse {
        token: state.tokens.issue(&user.email, role, user.user_id)?,
        token_type: "Bearer",
        user_id: user.user_id,
        email: user.email.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        user_type: user.user_type_name.clone(),
        expires_in: state.tokens.expiration_secs(),
    })
}
