use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Account email.
    pub sub: String,
    pub role: Role,
    pub uid: i32,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 issuer and validator for bearer and session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiration_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, expiration_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiration_secs,
        }
    }

    pub fn expiration_secs(&self) -> i64 {
        self.expiration_secs
    }

    pub fn issue(&self, email: &str, role: Role, user_id: i32) -> Result<String, AppError> {
        self.issue_at(email, role, user_id, Utc::now().timestamp())
    }

    pub(crate) fn issue_at(
        &self,
        email: &str,
        role: Role,
        user_id: i32,
        issued_at: i64,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: email.to_string(),
            role,
            uid: user_id,
            iat: issued_at,
            exp: issued_at + self.expiration_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("token signing failed: {e}")))
    }

    /// Rejects bad signatures, malformed tokens and expired tokens.
    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("token rejected: {e}");
                AppError::Unauthorized
            })
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.validate(token).is_ok()
    }
}
