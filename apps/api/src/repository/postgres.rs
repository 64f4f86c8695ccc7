use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{
    ApplicationRepository, CatalogRepository, JobRepository, ProfileRepository, RepoResult,
    SavedJobRepository, UserRepository,
};
use crate::errors::AppError;
use crate::jobs::search::{like_pattern, JobSearch};
use crate::models::application::{Application, ApplicationStatus, Candidate, NewApplication};
use crate::models::catalog::{JobCompany, JobLocation, LocationField, NewCompany, NewLocation};
use crate::models::job::{JobChanges, JobPost, NewJob, RecruiterJob, SavedJob};
use crate::models::profile::{
    JobSeekerProfile, RecruiterProfile, RecruiterProfileUpdate, SeekerProfileUpdate,
};
use crate::models::user::{NewUser, Role, User, UserType};

/// Postgres-backed implementation of every repository trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_SELECT: &str = r#"
    SELECT u.user_id, u.email, u.password, u.first_name, u.last_name, u.is_active,
           u.registration_date, u.user_type_id, t.user_type_name
    FROM users u
    JOIN users_type t ON t.user_type_id = u.user_type_id
"#;

const JOB_SELECT: &str = r#"
    SELECT j.job_post_id, j.posted_by_id, j.job_title, j.description_of_job, j.job_type,
           j.salary, j.remote, j.posted_date, j.job_location_id,
           l.city AS location_city, l.state AS location_state, l.country AS location_country,
           j.job_company_id, c.name AS company_name, c.website AS company_website,
           u.first_name AS poster_first_name, u.last_name AS poster_last_name,
           u.email AS poster_email
    FROM job_post_activity j
    JOIN users u ON u.user_id = j.posted_by_id
    LEFT JOIN job_location l ON l.id = j.job_location_id
    LEFT JOIN job_company c ON c.id = j.job_company_id
"#;

const APPLICATION_SELECT: &str = r#"
    SELECT a.id, a.user_id AS seeker_id, a.job AS job_id, a.apply_date, a.cover_letter,
           a.status, a.resume_path, a.last_updated, a.recruiter_notes,
           j.job_title, j.posted_by_id AS job_owner_id, c.name AS company_name,
           l.city AS location_city, l.state AS location_state,
           COALESCE(p.first_name, u.first_name) AS applicant_first_name,
           COALESCE(p.last_name, u.last_name) AS applicant_last_name,
           u.email AS applicant_email
    FROM job_seeker_apply a
    JOIN job_post_activity j ON j.job_post_id = a.job
    JOIN job_seeker_profile p ON p.user_account_id = a.user_id
    JOIN users u ON u.user_id = a.user_id
    LEFT JOIN job_company c ON c.id = j.job_company_id
    LEFT JOIN job_location l ON l.id = j.job_location_id
"#;

fn vanished(what: &str, id: i32) -> AppError {
    AppError::Internal(anyhow!("{what} {id} missing right after write"))
}

// ──────────────────────────────────────────────
// Users
// ──────────────────────────────────────────────

#[async_trait]
impl UserRepository for PgStore {
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE u.email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, user_id: i32) -> RepoResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE u.user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_type(&self, user_type_id: i32) -> RepoResult<Option<UserType>> {
        let user_type = sqlx::query_as::<_, UserType>(
            "SELECT user_type_id, user_type_name FROM users_type WHERE user_type_id = $1",
        )
        .bind(user_type_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user_type)
    }

    async fn create_with_profile(&self, user: NewUser) -> RepoResult<User> {
        let profile_sql = match Role::from_type_name(&user.user_type.user_type_name) {
            Some(Role::Recruiter) => {
                "INSERT INTO recruiter_profile (user_account_id, first_name, last_name) VALUES ($1, $2, $3)"
            }
            Some(Role::JobSeeker) => {
                "INSERT INTO job_seeker_profile (user_account_id, first_name, last_name) VALUES ($1, $2, $3)"
            }
            None => return Err(AppError::Validation("Invalid user type".to_string())),
        };

        let mut tx = self.pool.begin().await?;
        let user_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password, first_name, last_name, is_active, registration_date, user_type_id)
            VALUES ($1, $2, $3, $4, TRUE, NOW(), $5)
            RETURNING user_id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.user_type.user_type_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(profile_sql)
            .bind(user_id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        self.find_by_id(user_id)
            .await?
            .ok_or_else(|| vanished("user", user_id))
    }

    async fn update_names(
        &self,
        user_id: i32,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name), last_name = COALESCE($3, last_name)
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .bind(first_name)
        .bind(last_name)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// ──────────────────────────────────────────────
// Profiles
// ──────────────────────────────────────────────

#[async_trait]
impl ProfileRepository for PgStore {
    async fn seeker_profile(&self, user_id: i32) -> RepoResult<Option<JobSeekerProfile>> {
        let profile = sqlx::query_as::<_, JobSeekerProfile>(
            "SELECT * FROM job_seeker_profile WHERE user_account_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn recruiter_profile(&self, user_id: i32) -> RepoResult<Option<RecruiterProfile>> {
        let profile = sqlx::query_as::<_, RecruiterProfile>(
            "SELECT * FROM recruiter_profile WHERE user_account_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn upsert_seeker(&self, update: SeekerProfileUpdate) -> RepoResult<JobSeekerProfile> {
        let profile = sqlx::query_as::<_, JobSeekerProfile>(
            r#"
            INSERT INTO job_seeker_profile (
                user_account_id, first_name, last_name, phone, date_of_birth, gender, city,
                state, country, willing_to_relocate, current_job_title, experience, education,
                work_authorization, employment_type, expected_salary, availability_date,
                linkedin_profile, github_profile, portfolio_website, profile_photo, resume,
                resume_original_name, resume_upload_date, resume_file_size, cover_letter
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                    $18, $19, $20, $21, $22, $23, $24, $25, $26)
            ON CONFLICT (user_account_id) DO UPDATE SET
                first_name = COALESCE(EXCLUDED.first_name, job_seeker_profile.first_name),
                last_name = COALESCE(EXCLUDED.last_name, job_seeker_profile.last_name),
                phone = COALESCE(EXCLUDED.phone, job_seeker_profile.phone),
                date_of_birth = COALESCE(EXCLUDED.date_of_birth, job_seeker_profile.date_of_birth),
                gender = COALESCE(EXCLUDED.gender, job_seeker_profile.gender),
                city = COALESCE(EXCLUDED.city, job_seeker_profile.city),
                state = COALESCE(EXCLUDED.state, job_seeker_profile.state),
                country = COALESCE(EXCLUDED.country, job_seeker_profile.country),
                willing_to_relocate = COALESCE(EXCLUDED.willing_to_relocate, job_seeker_profile.willing_to_relocate),
                current_job_title = COALESCE(EXCLUDED.current_job_title, job_seeker_profile.current_job_title),
                experience = COALESCE(EXCLUDED.experience, job_seeker_profile.experience),
                education = COALESCE(EXCLUDED.education, job_seeker_profile.education),
                work_authorization = COALESCE(EXCLUDED.work_authorization, job_seeker_profile.work_authorization),
                employment_type = COALESCE(EXCLUDED.employment_type, job_seeker_profile.employment_type),
                expected_salary = COALESCE(EXCLUDED.expected_salary, job_seeker_profile.expected_salary),
                availability_date = COALESCE(EXCLUDED.availability_date, job_seeker_profile.availability_date),
                linkedin_profile = COALESCE(EXCLUDED.linkedin_profile, job_seeker_profile.linkedin_profile),
                github_profile = COALESCE(EXCLUDED.github_profile, job_seeker_profile.github_profile),
                portfolio_website = COALESCE(EXCLUDED.portfolio_website, job_seeker_profile.portfolio_website),
                profile_photo = COALESCE(EXCLUDED.profile_photo, job_seeker_profile.profile_photo),
                resume = COALESCE(EXCLUDED.resume, job_seeker_profile.resume),
                resume_original_name = COALESCE(EXCLUDED.resume_original_name, job_seeker_profile.resume_original_name),
                resume_upload_date = COALESCE(EXCLUDED.resume_upload_date, job_seeker_profile.resume_upload_date),
                resume_file_size = COALESCE(EXCLUDED.resume_file_size, job_seeker_profile.resume_file_size),
                cover_letter = COALESCE(EXCLUDED.cover_letter, job_seeker_profile.cover_letter)
            RETURNING *
            "#,
        )
        .bind(update.user_account_id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.phone)
        .bind(update.date_of_birth)
        .bind(update.gender)
        .bind(update.city)
        .bind(update.state)
        .bind(update.country)
        .bind(update.willing_to_relocate)
        .bind(update.current_job_title)
        .bind(update.experience)
        .bind(update.education)
        .bind(update.work_authorization)
        .bind(update.employment_type)
        .bind(update.expected_salary)
        .bind(update.availability_date)
        .bind(update.linkedin_profile)
        .bind(update.github_profile)
        .bind(update.portfolio_website)
        .bind(update.profile_photo)
        .bind(update.resume)
        .bind(update.resume_original_name)
        .bind(update.resume_upload_date)
        .bind(update.resume_file_size)
        .bind(update.cover_letter)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn upsert_recruiter(
        &self,
        update: RecruiterProfileUpdate,
    ) -> RepoResult<RecruiterProfile> {
        let profile = sqlx::query_as::<_, RecruiterProfile>(
            r#"
            INSERT INTO recruiter_profile (
                user_account_id, first_name, last_name, company, city, state, country,
                profile_photo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_account_id) DO UPDATE SET
                first_name = COALESCE(EXCLUDED.first_name, recruiter_profile.first_name),
                last_name = COALESCE(EXCLUDED.last_name, recruiter_profile.last_name),
                company = COALESCE(EXCLUDED.company, recruiter_profile.company),
                city = COALESCE(EXCLUDED.city, recruiter_profile.city),
                state = COALESCE(EXCLUDED.state, recruiter_profile.state),
                country = COALESCE(EXCLUDED.country, recruiter_profile.country),
                profile_photo = COALESCE(EXCLUDED.profile_photo, recruiter_profile.profile_photo)
            RETURNING *
            "#,
        )
        .bind(update.user_account_id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.company)
        .bind(update.city)
        .bind(update.state)
        .bind(update.country)
        .bind(update.profile_photo)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }
}

// ──────────────────────────────────────────────
// Catalog
// ──────────────────────────────────────────────

#[async_trait]
impl CatalogRepository for PgStore {
    async fn list_locations(&self) -> RepoResult<Vec<JobLocation>> {
        let rows = sqlx::query_as::<_, JobLocation>(
            "SELECT id, city, state, country FROM job_location ORDER BY country, state, city",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn location_by_id(&self, id: i32) -> RepoResult<Option<JobLocation>> {
        let row = sqlx::query_as::<_, JobLocation>(
            "SELECT id, city, state, country FROM job_location WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_location(
        &self,
        city: &str,
        state: &str,
        country: &str,
    ) -> RepoResult<Option<JobLocation>> {
        let row = sqlx::query_as::<_, JobLocation>(
            "SELECT id, city, state, country FROM job_location WHERE city = $1 AND state = $2 AND country = $3",
        )
        .bind(city)
        .bind(state)
        .bind(country)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_location(&self, location: NewLocation) -> RepoResult<JobLocation> {
        let row = sqlx::query_as::<_, JobLocation>(
            "INSERT INTO job_location (city, state, country) VALUES ($1, $2, $3) RETURNING id, city, state, country",
        )
        .bind(location.city)
        .bind(location.state)
        .bind(location.country)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn search_locations(
        &self,
        field: LocationField,
        term: &str,
    ) -> RepoResult<Vec<JobLocation>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT id, city, state, country FROM job_location WHERE ",
        );
        qb.push(field.column())
            .push(" ILIKE ")
            .push_bind(like_pattern(term))
            .push(" ORDER BY country, state, city");
        let rows = qb
            .build_query_as::<JobLocation>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_companies(&self) -> RepoResult<Vec<JobCompany>> {
        let rows = sqlx::query_as::<_, JobCompany>(
            "SELECT id, name, logo, website FROM job_company ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn company_by_id(&self, id: i32) -> RepoResult<Option<JobCompany>> {
        let row = sqlx::query_as::<_, JobCompany>(
            "SELECT id, name, logo, website FROM job_company WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_company_by_name(&self, name: &str) -> RepoResult<Option<JobCompany>> {
        let row = sqlx::query_as::<_, JobCompany>(
            "SELECT id, name, logo, website FROM job_company WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_company(&self, company: NewCompany) -> RepoResult<JobCompany> {
        let row = sqlx::query_as::<_, JobCompany>(
            "INSERT INTO job_company (name, logo, website) VALUES ($1, $2, $3) RETURNING id, name, logo, website",
        )
        .bind(company.name)
        .bind(company.logo)
        .bind(company.website)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn search_companies(&self, term: &str) -> RepoResult<Vec<JobCompany>> {
        let rows = sqlx::query_as::<_, JobCompany>(
            "SELECT id, name, logo, website FROM job_company WHERE name ILIKE $1 ORDER BY name",
        )
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// ──────────────────────────────────────────────
// Jobs
// ──────────────────────────────────────────────

#[async_trait]
impl JobRepository for PgStore {
    async fn search(&self, search: &JobSearch) -> RepoResult<Vec<JobPost>> {
        let mut qb = QueryBuilder::<Postgres>::new(JOB_SELECT);
        qb.push(" WHERE TRUE");
        if let Some(title) = &search.title {
            qb.push(" AND j.job_title ILIKE ").push_bind(like_pattern(title));
        }
        if let Some(location) = &search.location {
            let pattern = like_pattern(location);
            qb.push(" AND (l.city ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR l.state ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR l.country ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if !search.job_types.is_empty() {
            qb.push(" AND j.job_type = ANY(")
                .push_bind(search.job_types.clone())
                .push(")");
        }
        if !search.remote.is_empty() {
            qb.push(" AND j.remote = ANY(")
                .push_bind(search.remote.clone())
                .push(")");
        }
        if let Some(since) = search.posted_since {
            qb.push(" AND j.posted_date >= ").push_bind(since);
        }
        qb.push(" ORDER BY j.posted_date DESC, j.job_post_id DESC");
        if let Some(page) = search.page {
            qb.push(" LIMIT ")
                .push_bind(page.size)
                .push(" OFFSET ")
                .push_bind(page.offset());
        }

        let rows = qb.build_query_as::<JobPost>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn find(&self, job_id: i32) -> RepoResult<Option<JobPost>> {
        let row = sqlx::query_as::<_, JobPost>(&format!("{JOB_SELECT} WHERE j.job_post_id = $1"))
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create(&self, job: NewJob) -> RepoResult<JobPost> {
        let job_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO job_post_activity
                (posted_by_id, job_location_id, job_company_id, job_title, description_of_job,
                 job_type, salary, remote, posted_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING job_post_id
            "#,
        )
        .bind(job.posted_by_id)
        .bind(job.job_location_id)
        .bind(job.job_company_id)
        .bind(job.job_title)
        .bind(job.description_of_job)
        .bind(job.job_type)
        .bind(job.salary)
        .bind(job.remote)
        .bind(job.posted_date)
        .fetch_one(&self.pool)
        .await?;

        JobRepository::find(self, job_id)
            .await?
            .ok_or_else(|| vanished("job", job_id))
    }

    async fn update(&self, job_id: i32, changes: JobChanges) -> RepoResult<JobPost> {
        let result = sqlx::query(
            r#"
            UPDATE job_post_activity
            SET job_title = $2,
                description_of_job = $3,
                job_type = $4,
                salary = $5,
                remote = $6,
                job_location_id = COALESCE($7, job_location_id),
                job_company_id = COALESCE($8, job_company_id)
            WHERE job_post_id = $1
            "#,
        )
        .bind(job_id)
        .bind(changes.job_title)
        .bind(changes.description_of_job)
        .bind(changes.job_type)
        .bind(changes.salary)
        .bind(changes.remote)
        .bind(changes.job_location_id)
        .bind(changes.job_company_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Job not found".to_string()));
        }
        JobRepository::find(self, job_id)
            .await?
            .ok_or_else(|| vanished("job", job_id))
    }

    async fn delete(&self, job_id: i32) -> RepoResult<()> {
        // Applications and saves go with the job via ON DELETE CASCADE.
        sqlx::query("DELETE FROM job_post_activity WHERE job_post_id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn by_recruiter(&self, recruiter_id: i32) -> RepoResult<Vec<RecruiterJob>> {
        let sql = JOB_SELECT.replacen(
            "FROM job_post_activity j",
            ", (SELECT COUNT(*) FROM job_seeker_apply a WHERE a.job = j.job_post_id) AS total_candidates\n    FROM job_post_activity j",
            1,
        );
        let rows = sqlx::query_as::<_, RecruiterJob>(&format!(
            "{sql} WHERE j.posted_by_id = $1 ORDER BY j.posted_date DESC"
        ))
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn candidates(&self, job_id: i32) -> RepoResult<Vec<Candidate>> {
        let rows = sqlx::query_as::<_, Candidate>(
            r#"
            SELECT a.id AS application_id, u.user_id, u.first_name, u.last_name, u.email,
                   a.apply_date AS applied_date, a.status, p.work_authorization,
                   p.employment_type, p.resume, p.profile_photo
            FROM job_seeker_apply a
            JOIN users u ON u.user_id = a.user_id
            JOIN job_seeker_profile p ON p.user_account_id = a.user_id
            WHERE a.job = $1
            ORDER BY a.apply_date DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

// ──────────────────────────────────────────────
// Applications
// ──────────────────────────────────────────────

#[async_trait]
impl ApplicationRepository for PgStore {
    async fn exists(&self, seeker_id: i32, job_id: i32) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM job_seeker_apply WHERE user_id = $1 AND job = $2)",
        )
        .bind(seeker_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create(&self, application: NewApplication) -> RepoResult<Application> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO job_seeker_apply
                (user_id, job, apply_date, cover_letter, status, resume_path, last_updated)
            VALUES ($1, $2, $3, $4, $5, $6, $3)
            RETURNING id
            "#,
        )
        .bind(application.seeker_id)
        .bind(application.job_id)
        .bind(application.applied_at)
        .bind(application.cover_letter)
        .bind(ApplicationStatus::Applied)
        .bind(application.resume_path)
        .fetch_one(&self.pool)
        .await?;

        ApplicationRepository::find(self, id)
            .await?
            .ok_or_else(|| vanished("application", id))
    }

    async fn find(&self, id: i32) -> RepoResult<Option<Application>> {
        let row = sqlx::query_as::<_, Application>(&format!("{APPLICATION_SELECT} WHERE a.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_status(
        &self,
        id: i32,
        status: ApplicationStatus,
        notes: Option<String>,
        at: DateTime<Utc>,
    ) -> RepoResult<Application> {
        sqlx::query(
            r#"
            UPDATE job_seeker_apply
            SET status = $2, recruiter_notes = COALESCE($3, recruiter_notes), last_updated = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(notes)
        .bind(at)
        .execute(&self.pool)
        .await?;

        ApplicationRepository::find(self, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
    }

    async fn by_seeker(&self, seeker_id: i32) -> RepoResult<Vec<Application>> {
        let rows = sqlx::query_as::<_, Application>(&format!(
            "{APPLICATION_SELECT} WHERE a.user_id = $1 ORDER BY a.apply_date DESC"
        ))
        .bind(seeker_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_job(
        &self,
        job_id: i32,
        status: Option<ApplicationStatus>,
    ) -> RepoResult<Vec<Application>> {
        let rows = sqlx::query_as::<_, Application>(&format!(
            "{APPLICATION_SELECT} WHERE a.job = $1 AND ($2::application_status IS NULL OR a.status = $2) ORDER BY a.apply_date DESC"
        ))
        .bind(job_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_recruiter(
        &self,
        recruiter_id: i32,
        status: Option<ApplicationStatus>,
    ) -> RepoResult<Vec<Application>> {
        let rows = sqlx::query_as::<_, Application>(&format!(
            "{APPLICATION_SELECT} WHERE j.posted_by_id = $1 AND ($2::application_status IS NULL OR a.status = $2) ORDER BY a.apply_date DESC"
        ))
        .bind(recruiter_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn recent_for_recruiter(
        &self,
        recruiter_id: i32,
        since: DateTime<Utc>,
    ) -> RepoResult<Vec<Application>> {
        let rows = sqlx::query_as::<_, Application>(&format!(
            "{APPLICATION_SELECT} WHERE j.posted_by_id = $1 AND a.apply_date >= $2 ORDER BY a.apply_date DESC"
        ))
        .bind(recruiter_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn status_counts(
        &self,
        recruiter_id: i32,
    ) -> RepoResult<Vec<(ApplicationStatus, i64)>> {
        let rows = sqlx::query_as::<_, (ApplicationStatus, i64)>(
            r#"
            SELECT a.status, COUNT(*)
            FROM job_seeker_apply a
            JOIN job_post_activity j ON j.job_post_id = a.job
            WHERE j.posted_by_id = $1
            GROUP BY a.status
            "#,
        )
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn applied_job_ids(&self, seeker_id: i32) -> RepoResult<Vec<i32>> {
        let ids = sqlx::query_scalar("SELECT job FROM job_seeker_apply WHERE user_id = $1")
            .bind(seeker_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}

// ──────────────────────────────────────────────
// Saved jobs
// ──────────────────────────────────────────────

#[async_trait]
impl SavedJobRepository for PgStore {
    async fn exists(&self, seeker_id: i32, job_id: i32) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM job_seeker_save WHERE user_id = $1 AND job = $2)",
        )
        .bind(seeker_id)
        .bind(job_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn save(&self, seeker_id: i32, job_id: i32, at: DateTime<Utc>) -> RepoResult<()> {
        sqlx::query("INSERT INTO job_seeker_save (user_id, job, saved_at) VALUES ($1, $2, $3)")
            .bind(seeker_id)
            .bind(job_id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, seeker_id: i32, job_id: i32) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM job_seeker_save WHERE user_id = $1 AND job = $2")
            .bind(seeker_id)
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn by_seeker(&self, seeker_id: i32) -> RepoResult<Vec<SavedJob>> {
        let sql = JOB_SELECT
            .replacen(
                "SELECT ",
                "SELECT s.id AS save_id, s.user_id AS seeker_id, s.saved_at, ",
                1,
            )
            .replacen(
                "FROM job_post_activity j",
                "FROM job_seeker_save s\n    JOIN job_post_activity j ON j.job_post_id = s.job",
                1,
            );
        let rows = sqlx::query_as::<_, SavedJob>(&format!(
            "{sql} WHERE s.user_id = $1 ORDER BY s.saved_at DESC"
        ))
        .bind(seeker_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count(&self, seeker_id: i32) -> RepoResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM job_seeker_save WHERE user_id = $1")
                .bind(seeker_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
