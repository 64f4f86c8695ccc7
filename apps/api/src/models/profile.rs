use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobSeekerProfile {
    pub user_account_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub willing_to_relocate: Option<bool>,
    pub current_job_title: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub work_authorization: Option<String>,
    pub employment_type: Option<String>,
    pub expected_salary: Option<String>,
    pub availability_date: Option<NaiveDate>,
    pub linkedin_profile: Option<String>,
    pub github_profile: Option<String>,
    pub portfolio_website: Option<String>,
    pub profile_photo: Option<String>,
    pub resume: Option<String>,
    pub resume_original_name: Option<String>,
    pub resume_upload_date: Option<DateTime<Utc>>,
    pub resume_file_size: Option<i64>,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterProfile {
    pub user_account_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub profile_photo: Option<String>,
}

/// Partial update: `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeekerProfileUpdate {
    pub user_account_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub willing_to_relocate: Option<bool>,
    pub current_job_title: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub work_authorization: Option<String>,
    pub employment_type: Option<String>,
    pub expected_salary: Option<String>,
    pub availability_date: Option<NaiveDate>,
    pub linkedin_profile: Option<String>,
    pub github_profile: Option<String>,
    pub portfolio_website: Option<String>,
    pub profile_photo: Option<String>,
    pub resume: Option<String>,
    pub resume_original_name: Option<String>,
    pub resume_upload_date: Option<DateTime<Utc>>,
    pub resume_file_size: Option<i64>,
    pub cover_letter: Option<String>,
}

impl SeekerProfileUpdate {
    /// Applies the supplied fields on top of `profile`.
    pub fn apply_to(&self, profile: &mut JobSeekerProfile) {
        fn set<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                slot.clone_from(value);
            }
        }
        set(&mut profile.first_name, &self.first_name);
        set(&mut profile.last_name, &self.last_name);
        set(&mut profile.phone, &self.phone);
        set(&mut profile.date_of_birth, &self.date_of_birth);
        set(&mut profile.gender, &self.gender);
        set(&mut profile.city, &self.city);
        set(&mut profile.state, &self.state);
        set(&mut profile.country, &self.country);
        set(&mut profile.willing_to_relocate, &self.willing_to_relocate);
        set(&mut profile.current_job_title, &self.current_job_title);
        set(&mut profile.experience, &self.experience);
        set(&mut profile.education, &self.education);
        set(&mut profile.work_authorization, &self.work_authorization);
        set(&mut profile.employment_type, &self.employment_type);
        set(&mut profile.expected_salary, &self.expected_salary);
        set(&mut profile.availability_date, &self.availability_date);
        set(&mut profile.linkedin_profile, &self.linkedin_profile);
        set(&mut profile.github_profile, &self.github_profile);
        set(&mut profile.portfolio_website, &self.portfolio_website);
        set(&mut profile.profile_photo, &self.profile_photo);
        set(&mut profile.resume, &self.resume);
        set(&mut profile.resume_original_name, &self.resume_original_name);
        set(&mut profile.resume_upload_date, &self.resume_upload_date);
        set(&mut profile.resume_file_size, &self.resume_file_size);
        set(&mut profile.cover_letter, &self.cover_letter);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecruiterProfileUpdate {
    pub user_account_id: i32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub profile_photo: Option<String>,
}

impl RecruiterProfileUpdate {
    pub fn apply_to(&self, profile: &mut RecruiterProfile) {
        let pairs = [
            (&mut profile.first_name, &self.first_name),
            (&mut profile.last_name, &self.last_name),
            (&mut profile.company, &self.company),
            (&mut profile.city, &self.city),
            (&mut profile.state, &self.state),
            (&mut profile.country, &self.country),
            (&mut profile.profile_photo, &self.profile_photo),
        ];
        for (slot, value) in pairs {
            if value.is_some() {
                slot.clone_from(value);
            }
        }
    }
}
