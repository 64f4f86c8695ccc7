use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::debug;

use crate::errors::AppError;
use crate::models::user::Role;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "JOBPORTAL_SESSION";

/// The authenticated user attached to a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn is_recruiter(&self) -> bool {
        self.role == Role::Recruiter
    }

    pub fn is_job_seeker(&self) -> bool {
        self.role == Role::JobSeeker
    }

    pub fn require_recruiter(&self, message: &str) -> Result<(), AppError> {
        if self.is_recruiter() {
            Ok(())
        } else {
            Err(AppError::Forbidden(message.to_string()))
        }
    }

    pub fn require_job_seeker(&self, message: &str) -> Result<(), AppError> {
        if self.is_job_seeker() {
            Ok(())
        } else {
            Err(AppError::Forbidden(message.to_string()))
        }
    }
}

/// Bearer header first, then the session cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Attaches a `Principal` when the request carries a valid token for an
/// active user. Never rejects; handlers decide whether a principal is needed.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = token_from_headers(request.headers()) {
        if let Some(principal) = resolve_principal(&state, &token).await {
            request.extensions_mut().insert(principal);
        }
    }
    next.run(request).await
}

async fn resolve_principal(state: &AppState, token: &str) -> Option<Principal> {
    let claims = state.tokens.validate(token).ok()?;
    let user = match state.users.find_by_id(claims.uid).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            debug!("token for unknown user {}", claims.uid);
            return None;
        }
        Err(e) => {
            tracing::error!("user lookup during authentication failed: {e}");
            return None;
        }
    };
    if !user.is_active || user.email != claims.sub {
        debug!("token for inactive or renamed user {}", user.user_id);
        return None;
    }

    Some(Principal {
        user_id: user.user_id,
        email: user.email.clone(),
        role: user.role()?,
    })
}

/// Requires an authenticated principal (401 otherwise).
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// The principal when present.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<Principal>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(parts.extensions.get::<Principal>().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(
            "cookie",
            HeaderValue::from_static("JOBPORTAL_SESSION=from-cookie"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn test_cookie_used_without_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("theme=dark; JOBPORTAL_SESSION=xyz"),
        );
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn test_non_bearer_authorization_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        assert_eq!(token_from_headers(&headers), None);
    }

    #[test]
    fn test_role_checks() {
        let seeker = Principal {
            user_id: 1,
            email: "s@example.com".to_string(),
            role: Role::JobSeeker,
        };
        assert!(seeker.require_job_seeker("nope").is_ok());
        assert!(matches!(
            seeker.require_recruiter("Only recruiters can post jobs"),
            Err(AppError::Forbidden(msg)) if msg == "Only recruiters can post jobs"
        ));
    }
}
