use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::profile::{EmployerProfile, EmployerProfileUpdate, StudentProfile, UpdateStudentProfileRequest},
    errors::AppError,
    repositories::sqlx_repo::SqlxProfileRepo,
};

const STUDENT_COLUMNS: &str = r#"
    user_id, profile_img, first_name, last_name, phone, school, course,
    year_level, skills, bio
"#;

const EMPLOYER_COLUMNS: &str = r#"
    user_id, first_name, last_name, company_name, logo, phone, company_address,
    industry, company_size, description
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Loads the student profile, creating an empty one on first access.
    async fn get_or_create_student_profile(&self, user_id: &Uuid) -> Result<StudentProfile, AppError>;
    /// Loads the employer profile, creating an empty one on first access.
    async fn get_or_create_employer_profile(&self, user_id: &Uuid) -> Result<EmployerProfile, AppError>;
    async fn update_student_profile(
        &self,
        user_id: &Uuid,
        update: &UpdateStudentProfileRequest,
    ) -> Result<StudentProfile, AppError>;
    async fn update_employer_profile(
        &self,
        user_id: &Uuid,
        update: &EmployerProfileUpdate,
    ) -> Result<EmployerProfile, AppError>;
    /// Replaces the stored picture path and returns the previous one.
    async fn set_student_image(&self, user_id: &Uuid, path: &str) -> Result<Option<String>, AppError>;
    /// Replaces the stored logo path and returns the previous one.
    async fn set_employer_logo(&self, user_id: &Uuid, path: &str) -> Result<Option<String>, AppError>;
}

impl SqlxProfileRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProfileRepo { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepo {
    async fn get_or_create_student_profile(&self, user_id: &Uuid) -> Result<StudentProfile, AppError> {
        sqlx::query("INSERT INTO student_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let query = format!("SELECT {STUDENT_COLUMNS} FROM student_profiles WHERE user_id = $1");
        let profile = sqlx::query_as::<_, StudentProfile>(&query)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn get_or_create_employer_profile(&self, user_id: &Uuid) -> Result<EmployerProfile, AppError> {
        sqlx::query("INSERT INTO employer_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let query = format!("SELECT {EMPLOYER_COLUMNS} FROM employer_profiles WHERE user_id = $1");
        let profile = sqlx::query_as::<_, EmployerProfile>(&query)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn update_student_profile(
        &self,
        user_id: &Uuid,
        update: &UpdateStudentProfileRequest,
    ) -> Result<StudentProfile, AppError> {
        let query = format!(
            r#"
            INSERT INTO student_profiles
                (user_id, first_name, last_name, phone, school, course, year_level, skills, bio)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = EXCLUDED.phone,
                school = EXCLUDED.school,
                course = EXCLUDED.course,
                year_level = EXCLUDED.year_level,
                skills = EXCLUDED.skills,
                bio = EXCLUDED.bio
            RETURNING {STUDENT_COLUMNS}
            "#
        );

        let profile = sqlx::query_as::<_, StudentProfile>(&query)
            .bind(user_id)
            .bind(update.first_name.trim())
            .bind(update.last_name.trim())
            .bind(update.phone.trim())
            .bind(update.school.trim())
            .bind(update.course.trim())
            .bind(update.year_level)
            .bind(update.skills.trim())
            .bind(update.bio.trim())
            .fetch_one(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn update_employer_profile(
        &self,
        user_id: &Uuid,
        update: &EmployerProfileUpdate,
    ) -> Result<EmployerProfile, AppError> {
        let query = format!(
            r#"
            INSERT INTO employer_profiles
                (user_id, first_name, last_name, company_name, phone, company_address,
                 industry, company_size, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (user_id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                company_name = EXCLUDED.company_name,
                phone = EXCLUDED.phone,
                company_address = EXCLUDED.company_address,
                industry = EXCLUDED.industry,
                company_size = EXCLUDED.company_size,
                description = EXCLUDED.description
            RETURNING {EMPLOYER_COLUMNS}
            "#
        );

        let profile = sqlx::query_as::<_, EmployerProfile>(&query)
            .bind(user_id)
            .bind(&update.first_name)
            .bind(&update.last_name)
            .bind(&update.company_name)
            .bind(&update.phone)
            .bind(&update.company_address)
            .bind(&update.industry)
            .bind(update.company_size)
            .bind(&update.description)
            .fetch_one(&self.pool)
            .await?;

        Ok(profile)
    }

    async fn set_student_image(&self, user_id: &Uuid, path: &str) -> Result<Option<String>, AppError> {
        let previous: Option<String> = sqlx::query_scalar(
            r#"
            WITH old AS (SELECT profile_img FROM student_profiles WHERE user_id = $1)
            UPDATE student_profiles SET profile_img = $2
            WHERE user_id = $1
            RETURNING (SELECT profile_img FROM old)
            "#,
        )
        .bind(user_id)
        .bind(path)
        .fetch_one(&self.pool)
        .await?;

        Ok(previous)
    }

    async fn set_employer_logo(&self, user_id: &Uuid, path: &str) -> Result<Option<String>, AppError> {
        let previous: Option<String> = sqlx::query_scalar(
            r#"
            WITH old AS (SELECT logo FROM employer_profiles WHERE user_id = $1)
            UPDATE employer_profiles SET logo = $2
            WHERE user_id = $1
            RETURNING (SELECT logo FROM old)
            "#,
        )
        .bind(user_id)
        .bind(path)
        .fetch_one(&self.pool)
        .await?;

        Ok(previous)
    }
}
