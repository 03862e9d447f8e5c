use std::borrow::Cow;

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::{
        application::{ApplicantItem, Application, ApplicationInsert, ApplicationStatus, AppliedJobItem},
        job::ListFilter,
    },
    errors::AppError,
    repositories::{job::like_pattern, sqlx_repo::SqlxApplicationRepo},
};

pub const ALREADY_APPLIED_MESSAGE: &str = "You already applied for this job.";

const APPLICATION_COLUMNS: &str = "id, job_id, applicant_id, status, resume, applied_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn create_application(&self, application: &ApplicationInsert) -> Result<Application, AppError>;
    async fn has_applied(&self, job_id: &Uuid, applicant_id: &Uuid) -> Result<bool, AppError>;
    async fn count_applied(&self, applicant_id: &Uuid, filter: &ListFilter) -> Result<i64, AppError>;
    async fn list_applied(
        &self,
        applicant_id: &Uuid,
        filter: &ListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AppliedJobItem>, AppError>;
    async fn list_for_job(&self, job_id: &Uuid) -> Result<Vec<ApplicantItem>, AppError>;
    /// An application to one of `employer_id`'s jobs.
    async fn get_for_employer(&self, id: &Uuid, employer_id: &Uuid) -> Result<Option<Application>, AppError>;
    async fn set_status_for_employer(
        &self,
        id: &Uuid,
        employer_id: &Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, AppError>;
}

impl SqlxApplicationRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxApplicationRepo { pool }
    }
}

fn push_applied_filter(builder: &mut QueryBuilder<'_, Postgres>, applicant_id: &Uuid, filter: &ListFilter) {
    builder.push(" WHERE a.applicant_id = ").push_bind(*applicant_id);

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (j.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR ep.company_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(status) = filter.status {
        builder.push(" AND j.status = ").push_bind(status);
    }
}

const APPLIED_SOURCE: &str = r#"
    applications a
    JOIN jobs j ON j.id = a.job_id
    LEFT JOIN employer_profiles ep ON ep.user_id = j.employer_id
"#;

#[async_trait]
impl ApplicationRepository for SqlxApplicationRepo {
    async fn create_application(&self, application: &ApplicationInsert) -> Result<Application, AppError> {
        let query = format!(
            "INSERT INTO applications (id, job_id, applicant_id, resume)
             VALUES ($1, $2, $3, $4)
             RETURNING {APPLICATION_COLUMNS}"
        );

        sqlx::query_as::<_, Application>(&query)
            .bind(Uuid::new_v4())
            .bind(application.job_id)
            .bind(application.applicant_id)
            .bind(&application.resume)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                match e {
                    sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                        AppError::Conflict(ALREADY_APPLIED_MESSAGE.to_string())
                    }
                    sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23503")) => {
                        AppError::NotFound("Job not found".to_string())
                    }
                    _ => AppError::from(e),
                }
            })
    }

    async fn has_applied(&self, job_id: &Uuid, applicant_id: &Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM applications WHERE job_id = $1 AND applicant_id = $2)"
        )
        .bind(job_id)
        .bind(applicant_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count_applied(&self, applicant_id: &Uuid, filter: &ListFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {APPLIED_SOURCE}"));
        push_applied_filter(&mut builder, applicant_id, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn list_applied(
        &self,
        applicant_id: &Uuid,
        filter: &ListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AppliedJobItem>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            r#"
            SELECT
                a.id AS application_id,
                a.status,
                a.applied_at,
                j.id AS job_id,
                j.title AS job_title,
                j.status AS job_status,
                j.location,
                NULLIF(ep.company_name, '') AS company_name
            FROM {APPLIED_SOURCE}
            "#
        ));
        push_applied_filter(&mut builder, applicant_id, filter);
        builder
            .push(" ORDER BY a.applied_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let items = builder
            .build_query_as::<AppliedJobItem>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn list_for_job(&self, job_id: &Uuid) -> Result<Vec<ApplicantItem>, AppError> {
        sqlx::query_as::<_, ApplicantItem>(
            r#"
            SELECT
                a.id AS application_id,
                a.status,
                a.applied_at,
                (a.resume IS NOT NULL AND a.resume <> '') AS has_resume,
                u.id AS applicant_id,
                u.email,
                NULLIF(sp.first_name, '') AS first_name,
                NULLIF(sp.last_name, '') AS last_name,
                NULLIF(sp.school, '') AS school,
                NULLIF(sp.course, '') AS course
            FROM applications a
            JOIN users u ON u.id = a.applicant_id
            LEFT JOIN student_profiles sp ON sp.user_id = u.id
            WHERE a.job_id = $1
            ORDER BY a.applied_at DESC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_for_employer(&self, id: &Uuid, employer_id: &Uuid) -> Result<Option<Application>, AppError> {
        sqlx::query_as::<_, Application>(
            r#"
            SELECT a.id, a.job_id, a.applicant_id, a.status, a.resume, a.applied_at
            FROM applications a
            JOIN jobs j ON j.id = a.job_id
            WHERE a.id = $1 AND j.employer_id = $2
            "#,
        )
        .bind(id)
        .bind(employer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn set_status_for_employer(
        &self,
        id: &Uuid,
        employer_id: &Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, AppError> {
        sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications a SET status = $3
            FROM jobs j
            WHERE a.id = $1 AND j.id = a.job_id AND j.employer_id = $2
            RETURNING a.id, a.job_id, a.applicant_id, a.status, a.resume, a.applied_at
            "#,
        )
        .bind(id)
        .bind(employer_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
