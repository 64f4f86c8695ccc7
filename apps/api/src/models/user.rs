use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The two account types. Stored as rows of `users_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Recruiter")]
    Recruiter,
    #[serde(rename = "Job Seeker")]
    JobSeeker,
}

impl Role {
    pub fn type_id(self) -> i32 {
        match self {
            Role::Recruiter => 1,
            Role::JobSeeker => 2,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Role::Recruiter => "Recruiter",
            Role::JobSeeker => "Job Seeker",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Recruiter" => Some(Role::Recruiter),
            "Job Seeker" => Some(Role::JobSeeker),
            _ => None,
        }
    }

    /// Directory segment under `photos/` holding this role's uploads.
    pub fn upload_dir(self) -> &'static str {
        match self {
            Role::Recruiter => "recruiter",
            Role::JobSeeker => "candidate",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserType {
    pub user_type_id: i32,
    pub user_type_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub registration_date: DateTime<Utc>,
    pub user_type_id: i32,
    pub user_type_name: String,
}

impl User {
    pub fn role(&self) -> Option<Role> {
        Role::from_type_name(&self.user_type_name)
    }
}

/// Insert payload; `password_hash` is already an argon2 PHC string.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
}
