use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    UnderReview,
    InterviewScheduled,
    Interviewed,
    Offered,
    Hired,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    /// Pipeline order; the last two are terminal alternatives.
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Applied,
        ApplicationStatus::UnderReview,
        ApplicationStatus::InterviewScheduled,
        ApplicationStatus::Interviewed,
        ApplicationStatus::Offered,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::UnderReview => "UNDER_REVIEW",
            ApplicationStatus::InterviewScheduled => "INTERVIEW_SCHEDULED",
            ApplicationStatus::Interviewed => "INTERVIEWED",
            ApplicationStatus::Offered => "OFFERED",
            ApplicationStatus::Hired => "HIRED",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Withdrawn => "WITHDRAWN",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::Interviewed => "Interviewed",
            ApplicationStatus::Offered => "Offered",
            ApplicationStatus::Hired => "Hired",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.name().eq_ignore_ascii_case(name))
    }

    /// Position in the hiring pipeline. Terminal alternatives have none.
    pub fn stage(self) -> Option<usize> {
        match self {
            ApplicationStatus::Rejected | ApplicationStatus::Withdrawn => None,
            other => Self::ALL.iter().position(|s| *s == other),
        }
    }

    pub fn is_absorbing(self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Withdrawn)
    }

    pub fn can_withdraw(self) -> bool {
        !matches!(self, ApplicationStatus::Hired | ApplicationStatus::Withdrawn)
    }
}

/// An application joined with its job, company, location and applicant.
#[derive(Debug, Clone, FromRow)]
pub struct Application {
    pub id: i32,
    pub seeker_id: i32,
    pub job_id: i32,
    pub apply_date: DateTime<Utc>,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub resume_path: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub recruiter_notes: Option<String>,
    pub job_title: String,
    pub job_owner_id: i32,
    pub company_name: Option<String>,
    pub location_city: Option<String>,
    pub location_state: Option<String>,
    pub applicant_first_name: Option<String>,
    pub applicant_last_name: Option<String>,
    pub applicant_email: String,
}

impl Application {
    pub fn applicant_name(&self) -> String {
        let parts: Vec<&str> = [&self.applicant_first_name, &self.applicant_last_name]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.trim().is_empty())
            .collect();
        parts.join(" ")
    }

    /// "City, State" when the job has a location.
    pub fn location_label(&self) -> Option<String> {
        match (&self.location_city, &self.location_state) {
            (Some(city), Some(state)) => Some(format!("{city}, {state}")),
            _ => None,
        }
    }
}

/// An applicant to one job, as shown to the job's recruiter.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub application_id: i32,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub applied_date: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub work_authorization: Option<String>,
    pub employment_type: Option<String>,
    pub resume: Option<String>,
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub seeker_id: i32,
    pub job_id: i32,
    pub cover_letter: Option<String>,
    pub resume_path: Option<String>,
    pub applied_at: DateTime<Utc>,
}
