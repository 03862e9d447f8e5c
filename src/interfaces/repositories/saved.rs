use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    entities::{job::ListFilter, saved::SavedJobRow},
    errors::AppError,
    repositories::{job::like_pattern, sqlx_repo::SqlxSavedRepo},
};

const SAVED_SOURCE: &str = r#"
    saved_jobs s
    JOIN jobs j ON j.id = s.job_id
    LEFT JOIN employer_profiles ep ON ep.user_id = j.employer_id
"#;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SavedRepository: Send + Sync {
    /// Removes the bookmark if it exists, creates it otherwise. Returns whether
    /// the job is saved afterwards.
    async fn toggle_saved(&self, user_id: &Uuid, job_id: &Uuid) -> Result<bool, AppError>;
    /// Which of `job_ids` the user has saved.
    async fn saved_job_ids(&self, user_id: &Uuid, job_ids: &[Uuid]) -> Result<Vec<Uuid>, AppError>;
    async fn count_saved(&self, user_id: &Uuid, filter: &ListFilter) -> Result<i64, AppError>;
    async fn list_saved(
        &self,
        user_id: &Uuid,
        filter: &ListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SavedJobRow>, AppError>;
}

impl SqlxSavedRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSavedRepo { pool }
    }
}

fn push_saved_filter(builder: &mut QueryBuilder<'_, Postgres>, user_id: &Uuid, filter: &ListFilter) {
    builder.push(" WHERE s.user_id = ").push_bind(*user_id);

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

#[async_trait]
impl SavedRepository for SqlxSavedRepo {
    async fn toggle_saved(&self, user_id: &Uuid, job_id: &Uuid) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
            .bind(user_id)
            .bind(job_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            sqlx::query(
                "INSERT INTO saved_jobs (id, user_id, job_id) VALUES ($1, $2, $3)
                 ON CONFLICT (user_id, job_id) DO NOTHING",
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(job_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(removed == 0)
    }

    async fn saved_job_ids(&self, user_id: &Uuid, job_ids: &[Uuid]) -> Result<Vec<Uuid>, AppError> {
        if job_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT job_id FROM saved_jobs WHERE user_id = $1 AND job_id = ANY($2)"
        )
        .bind(user_id)
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn count_saved(&self, user_id: &Uuid, filter: &ListFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {SAVED_SOURCE}"));
        push_saved_filter(&mut builder, user_id, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn list_saved(
        &self,
        user_id: &Uuid,
        filter: &ListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SavedJobRow>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            r#"
            SELECT
                s.created_at AS saved_at,
                j.id AS job_id,
                j.title,
                NULLIF(ep.company_name, '') AS company_name,
                j.location,
                j.status,
                j.workplace,
                j.work_type,
                j.pay_min,
                j.pay_max,
                j.created_at
            FROM {SAVED_SOURCE}
            "#
        ));
        push_saved_filter(&mut builder, user_id, filter);
        builder
            .push(" ORDER BY s.created_at DESC LIMIT ")
            .push_bind(limit)
            .push(" OFFSET ")
            .push_bind(offset);

        let rows = builder
            .build_query_as::<SavedJobRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
