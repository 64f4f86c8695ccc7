//! Role profiles, profile uploads and access to stored files.

pub mod handlers;
pub mod upload;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::info;

use crate::auth::middleware::Principal;
use crate::errors::AppError;
use crate::models::profile::{
    JobSeekerProfile, RecruiterProfile, RecruiterProfileUpdate, SeekerProfileUpdate,
};
use crate::models::user::{Role, User};
use crate::profiles::upload::{ProfileForm, UploadedFile};
use crate::state::AppState;
use crate::storage::{sanitize_file_name, upload_key, StoredFile};

/// The user row merged with whichever role profile it has.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_type: String,
    pub registration_date: Option<DateTime<Utc>>,
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
    pub company: Option<String>,
}

impl UserProfile {
    fn base(user: &User) -> Self {
        UserProfile {
            user_id: user.user_id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            user_type: user.user_type_name.clone(),
            registration_date: Some(user.registration_date),
            ..Default::default()
        }
    }

    fn with_seeker(mut self, p: JobSeekerProfile) -> Self {
        self.phone = p.phone;
        self.date_of_birth = p.date_of_birth;
        self.gender = p.gender;
        self.city = p.city;
        self.state = p.state;
        self.country = p.country;
        self.willing_to_relocate = p.willing_to_relocate;
        self.current_job_title = p.current_job_title;
        self.experience = p.experience;
        self.education = p.education;
        self.work_authorization = p.work_authorization;
        self.employment_type = p.employment_type;
        self.expected_salary = p.expected_salary;
        self.availability_date = p.availability_date;
        self.linkedin_profile = p.linkedin_profile;
        self.github_profile = p.github_profile;
        self.portfolio_website = p.portfolio_website;
        self.profile_photo = p.profile_photo;
        self.resume = p.resume;
        self.resume_original_name = p.resume_original_name;
        self.resume_upload_date = p.resume_upload_date;
        self.resume_file_size = p.resume_file_size;
        self.cover_letter = p.cover_letter;
        self
    }

    fn with_recruiter(mut self, p: RecruiterProfile) -> Self {
        self.company = p.company;
        self.city = p.city;
        self.state = p.state;
        self.country = p.country;
        self.profile_photo = p.profile_photo;
        self
    }
}

async fn current_user(state: &AppState, principal: &Principal) -> Result<User, AppError> {
    state
        .users
        .find_by_id(principal.user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

pub async fn get_profile(state: &AppState, principal: &Principal) -> Result<UserProfile, AppError> {
    let user = current_user(state, principal).await?;
    let profile = UserProfile::base(&user);
    Ok(match user.role() {
        Some(Role::JobSeeker) => match state.profiles.seeker_profile(user.user_id).await? {
            Some(seeker) => profile.with_seeker(seeker),
            None => profile,
        },
        Some(Role::Recruiter) => match state.profiles.recruiter_profile(user.user_id).await? {
            Some(recruiter) => profile.with_recruiter(recruiter),
            None => profile,
        },
        None => profile,
    })
}

/// Stores an upload under the user's directory and returns the bare file name.
async fn store_upload(
    state: &AppState,
    role: Role,
    user_id: i32,
    file: &UploadedFile,
) -> Result<String, AppError> {
    let name = sanitize_file_name(&file.file_name)
        .ok_or_else(|| AppError::Validation("Invalid file name".to_string()))?;
    let key = upload_key(role.upload_dir(), user_id, &name);
    state
        .files
        .put(&key, file.bytes.clone(), file.content_type.as_deref())
        .await?;
    info!("Stored upload {key} ({} bytes)", file.bytes.len());
    Ok(name)
}

async fn update_names(state: &AppState, user_id: i32, form: &ProfileForm) -> Result<(), AppError> {
    let first = form.text("firstName");
    let last = form.text("lastName");
    if first.is_some() || last.is_some() {
        state.users.update_names(user_id, first, last).await?;
    }
    Ok(())
}

pub async fn update_seeker(
    state: &AppState,
    principal: &Principal,
    mut form: ProfileForm,
) -> Result<UserProfile, AppError> {
    principal.require_job_seeker("Only job seekers can update job seeker profile")?;
    let user_id = principal.user_id;

    let mut update = SeekerProfileUpdate {
        user_account_id: user_id,
        first_name: form.text("firstName"),
        last_name: form.text("lastName"),
        phone: form.text("phone"),
        date_of_birth: form.date("dateOfBirth"),
        gender: form.text("gender"),
        city: form.text("city"),
        state: form.text("state"),
        country: form.text("country"),
        willing_to_relocate: form.flag("willingToRelocate"),
        current_job_title: form.text("currentJobTitle"),
        experience: form.text("experience"),
        education: form.text("education"),
        work_authorization: form.text("workAuthorization"),
        employment_type: form.text("employmentType"),
        expected_salary: form.text("expectedSalary"),
        availability_date: form.date("availabilityDate"),
        linkedin_profile: form.text("linkedinProfile"),
        github_profile: form.text("githubProfile"),
        portfolio_website: form.text("portfolioWebsite"),
        cover_letter: form.text("coverLetter"),
        ..Default::default()
    };

    if let Some(photo) = form.take_file("profilePhoto") {
        update.profile_photo = Some(store_upload(state, Role::JobSeeker, user_id, &photo).await?);
    }
    if let Some(resume) = form.take_file("resume") {
        let stored = store_upload(state, Role::JobSeeker, user_id, &resume).await?;
        update.resume_original_name = Some(resume.file_name.clone());
        update.resume_upload_date = Some(Utc::now());
        update.resume_file_size = Some(resume.bytes.len() as i64);
        update.resume = Some(stored);
    }

    update_names(state, user_id, &form).await?;
    state.profiles.upsert_seeker(update).await?;
    info!("Job seeker profile {user_id} updated");
    get_profile(state, principal).await
}

pub async fn update_recruiter(
    state: &AppState,
    principal: &Principal,
    mut form: ProfileForm,
) -> Result<UserProfile, AppError> {
    principal.require_recruiter("Only recruiters can update recruiter profile")?;
    let user_id = principal.user_id;

    let mut update = RecruiterProfileUpdate {
        user_account_id: user_id,
        first_name: form.text("firstName"),
        last_name: form.text("lastName"),
        company: form.text("company"),
        city: form.text("city"),
        state: form.text("state"),
        country: form.text("country"),
        profile_photo: None,
    };
    if let Some(photo) = form.take_file("profilePhoto") {
        update.profile_photo = Some(store_upload(state, Role::Recruiter, user_id, &photo).await?);
    }

    update_names(state, user_id, &form).await?;
    state.profiles.upsert_recruiter(update).await?;
    info!("Recruiter profile {user_id} updated");
    get_profile(state, principal).await
}

/// Public path of one of the principal's uploads.
pub fn download_path(principal: &Principal, file_name: &str) -> Result<String, AppError> {
    let name = sanitize_file_name(file_name)
        .ok_or_else(|| AppError::Validation("Invalid file name".to_string()))?;
    Ok(format!(
        "/{}",
        upload_key(principal.role.upload_dir(), principal.user_id, &name)
    ))
}

/// `key` is relative to `photos/`.
pub async fn fetch_upload(state: &AppState, key: &str) -> Result<StoredFile, AppError> {
    let not_found = || AppError::NotFound("File not found".to_string());
    if key.is_empty() || key.split('/').any(|seg| seg.is_empty() || seg == "..") {
        return Err(not_found());
    }
    state
        .files
        .get(&format!("photos/{key}"))
        .await?
        .ok_or_else(not_found)
}
