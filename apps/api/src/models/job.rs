use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const JOB_TYPES: [&str; 4] = ["Part-Time", "Full-Time", "Freelance", "InternShip"];
pub const REMOTE_OPTIONS: [&str; 3] = ["Remote-Only", "Office-Only", "Partial-Remote"];

/// A job post joined with its poster, location and company.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPost {
    pub job_post_id: i32,
    pub posted_by_id: i32,
    pub job_title: String,
    pub description_of_job: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub remote: Option<String>,
    pub posted_date: DateTime<Utc>,
    pub job_location_id: Option<i32>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub location_country: Option<String>,
    pub job_company_id: Option<i32>,
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub poster_first_name: String,
    pub poster_last_name: String,
    pub poster_email: String,
}

impl JobPost {
    /// "City, Country" when the job has a location.
    pub fn location_label(&self) -> Option<String> {
        match (&self.location_city, &self.location_country) {
            (Some(city), Some(country)) => Some(format!("{city}, {country}")),
            _ => None,
        }
    }

    pub fn is_remote_friendly(&self) -> bool {
        matches!(
            self.remote.as_deref(),
            Some("Remote-Only") | Some("Partial-Remote")
        )
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RecruiterJob {
    #[sqlx(flatten)]
    pub job: JobPost,
    pub total_candidates: i64,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub posted_by_id: i32,
    pub job_location_id: Option<i32>,
    pub job_company_id: Option<i32>,
    pub job_title: String,
    pub description_of_job: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub remote: Option<String>,
    pub posted_date: DateTime<Utc>,
}

/// Full replacement of the editable job fields. Location and company are
/// only changed when present.
#[derive(Debug, Clone)]
pub struct JobChanges {
    pub job_title: String,
    pub description_of_job: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<String>,
    pub remote: Option<String>,
    pub job_location_id: Option<i32>,
    pub job_company_id: Option<i32>,
}

/// A saved-job row joined with the job it points at.
#[derive(Debug, Clone, FromRow)]
pub struct SavedJob {
    pub save_id: i32,
    pub seeker_id: i32,
    pub saved_at: DateTime<Utc>,
    #[sqlx(flatten)]
    pub job: JobPost,
}
