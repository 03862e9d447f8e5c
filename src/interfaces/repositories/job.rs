use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::job::{Job, JobFilter, JobInsert, JobStatus, JobWithCount, ListFilter},
    errors::AppError,
    repositories::sqlx_repo::SqlxJobRepo,
};

/// Job columns plus the employer's company name. Expects `jobs` aliased as `j`
/// and a `LEFT JOIN employer_profiles ep`.
const JOB_COLUMNS: &str = r#"
    j.id, j.employer_id, j.status, j.title, j.location, j.workplace, j.work_type,
    j.pay_type, j.pay_min, j.pay_max, j.job_description, j.summary, j.created_at,
    NULLIF(ep.company_name, '') AS company_name
"#;

const JOB_SOURCE: &str = "jobs j LEFT JOIN employer_profiles ep ON ep.user_id = j.employer_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError>;
    /// Updates a job owned by `employer_id`. `None` when no such job exists.
    async fn update_job(&self, id: &Uuid, employer_id: &Uuid, job: &JobInsert) -> Result<Option<Job>, AppError>;
    async fn get_job(&self, id: &Uuid) -> Result<Option<Job>, AppError>;
    async fn get_owned_job(&self, id: &Uuid, employer_id: &Uuid) -> Result<Option<Job>, AppError>;
    async fn featured_jobs(&self, limit: i64) -> Result<Vec<Job>, AppError>;
    async fn count_active_jobs(&self, filter: &JobFilter) -> Result<i64, AppError>;
    async fn list_active_jobs(&self, filter: &JobFilter, limit: i64, offset: i64) -> Result<Vec<Job>, AppError>;
    async fn count_employer_jobs(&self, employer_id: &Uuid, filter: &ListFilter) -> Result<i64, AppError>;
    async fn list_employer_jobs(
        &self,
        employer_id: &Uuid,
        filter: &ListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JobWithCount>, AppError>;
    async fn set_job_status(&self, id: &Uuid, employer_id: &Uuid, status: JobStatus) -> Result<Option<Job>, AppError>;
    /// Deletes an owned job. Returns `false` when nothing matched.
    async fn delete_job(&self, id: &Uuid, employer_id: &Uuid) -> Result<bool, AppError>;
}

impl SqlxJobRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxJobRepo { pool }
    }
}

/// Wraps user input in `%...%` with LIKE wildcards escaped.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn push_active_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    builder.push(" WHERE j.status = ").push_bind(JobStatus::Active);

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        builder
            .push(" AND (j.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR ep.company_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR j.job_description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR j.summary ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(location) = &filter.location {
        builder.push(" AND j.location ILIKE ").push_bind(like_pattern(location));
    }
    if let Some(workplace) = filter.workplace {
        builder.push(" AND j.workplace = ").push_bind(workplace);
    }
    if let Some(work_type) = filter.work_type {
        builder.push(" AND j.work_type = ").push_bind(work_type);
    }
    if let Some(since) = filter.posted_since {
        builder.push(" AND j.created_at >= ").push_bind(since);
    }
}

fn push_employer_filter(builder: &mut QueryBuilder<'_, Postgres>, employer_id: &Uuid, filter: &ListFilter) {
    builder.push(" WHERE j.employer_id = ").push_bind(*employer_id);

    if let Some(search) = &filter.search {
        builder.push(" AND j.title ILIKE ").push_bind(like_pattern(search));
    }
    if let Some(status) = filter.status {
        builder.push(" AND j.status = ").push_bind(status);
    }
}

#[async_trait]
impl JobRepository for SqlxJobRepo {
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError> {
        let query = format!(
            r#"
            WITH j AS (
                INSERT INTO jobs (
                    id, employer_id, title, location, workplace, work_type, pay_type,
                    pay_min, pay_max, job_description, summary
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING *
            )
            SELECT {JOB_COLUMNS}
            FROM j LEFT JOIN employer_profiles ep ON ep.user_id = j.employer_id
            "#
        );

        let created = sqlx::query_as::<_, Job>(&query)
            .bind(Uuid::new_v4())
            .bind(job.employer_id)
            .bind(&job.title)
            .bind(&job.location)
            .bind(job.workplace)
            .bind(job.work_type)
            .bind(job.pay_type)
            .bind(job.pay_min)
            .bind(job.pay_max)
            .bind(&job.job_description)
            .bind(&job.summary)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update_job(&self, id: &Uuid, employer_id: &Uuid, job: &JobInsert) -> Result<Option<Job>, AppError> {
        let query = format!(
            r#"
            WITH j AS (
                UPDATE jobs SET
                    title = $3,
                    location = $4,
                    workplace = $5,
                    work_type = $6,
                    pay_type = $7,
                    pay_min = $8,
                    pay_max = $9,
                    job_description = $10,
                    summary = $11
                WHERE id = $1 AND employer_id = $2
                RETURNING *
            )
            SELECT {JOB_COLUMNS}
            FROM j LEFT JOIN employer_profiles ep ON ep.user_id = j.employer_id
            "#
        );

        let updated = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(employer_id)
            .bind(&job.title)
            .bind(&job.location)
            .bind(job.workplace)
            .bind(job.work_type)
            .bind(job.pay_type)
            .bind(job.pay_min)
            .bind(job.pay_max)
            .bind(&job.job_description)
            .bind(&job.summary)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn get_job(&self, id: &Uuid) -> Result<Option<Job>, AppError> {
        let query = format!("SELECT {JOB_COLUMNS} FROM {JOB_SOURCE} WHERE j.id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_owned_job(&self, id: &Uuid, employer_id: &Uuid) -> Result<Option<Job>, AppError> {
        let query = format!("SELECT {JOB_COLUMNS} FROM {JOB_SOURCE} WHERE j.id = $1 AND j.employer_id = $2");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(employer_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn featured_jobs(&self, limit: i64) -> Result<Vec<Job>, AppError> {
        let query = format!(
            "SELECT {JOB_COLUMNS} FROM {JOB_SOURCE}
             WHERE j.status = 'active'
             ORDER BY j.created_at DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn count_active_jobs(&self, filter: &JobFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {JOB_SOURCE}"));
        push_active_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_active_jobs(&self, filter: &JobFilter, limit: i64, offset: i64) -> Result<Vec<Job>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {JOB_COLUMNS} FROM {JOB_SOURCE}"));
        push_active_filter(&mut builder, filter);
        builder
            .push(" ORDER BY j.created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let jobs = builder
            .build_query_as::<Job>()
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    async fn count_employer_jobs(&self, employer_id: &Uuid, filter: &ListFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs j");
        push_employer_filter(&mut builder, employer_id, filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_employer_jobs(
        &self,
        employer_id: &Uuid,
        filter: &ListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<JobWithCount>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {JOB_COLUMNS},
                (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count
             FROM {JOB_SOURCE}"
        ));
        push_employer_filter(&mut builder, employer_id, filter);
        builder
            .push(" ORDER BY j.created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let jobs = builder
            .build_query_as::<JobWithCount>()
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    async fn set_job_status(&self, id: &Uuid, employer_id: &Uuid, status: JobStatus) -> Result<Option<Job>, AppError> {
        let query = format!(
            r#"
            WITH j AS (
                UPDATE jobs SET status = $3
                WHERE id = $1 AND employer_id = $2
                RETURNING *
            )
            SELECT {JOB_COLUMNS}
            FROM j LEFT JOIN employer_profiles ep ON ep.user_id = j.employer_id
            "#
        );

        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(employer_id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn delete_job(&self, id: &Uuid, employer_id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1 AND employer_id = $2")
            .bind(id)
            .bind(employer_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::job::Workplace;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("dev"), "%dev%");
        assert_eq!(like_pattern("100%_sure"), "%100\\%\\_sure%");
    }

    #[test]
    fn active_filter_binds_only_present_fields() {
        let filter = JobFilter {
            search: Some("rust".into()),
            workplace: Some(Workplace::Remote),
            ..Default::default()
        };
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM jobs j");
        push_active_filter(&mut builder, &filter);
        let sql = builder.sql();

        assert!(sql.contains("j.status = $1"));
        assert!(sql.contains("j.summary ILIKE $5"));
        assert!(sql.contains("j.workplace = $6"));
        assert!(!sql.contains("j.location"));
        assert!(!sql.contains("created_at >="));
    }
}
