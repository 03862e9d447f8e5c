use chrono::Utc;
use uuid::Uuid;

use crate::{
    entities::{
        job::{ListFilter, ListQuery},
        pagination::{Page, PageRequest},
        saved::{SavedJobsResponse, ToggleSaveResponse, SAVED_PER_PAGE},
    },
    errors::AppError,
    repositories::{job::JobRepository, saved::SavedRepository},
    use_cases::jobs::JOB_NOT_FOUND_MESSAGE,
};

pub struct SavedHandler<S, J>
where
    S: SavedRepository,
    J: JobRepository,
{
    pub saved_repo: S,
    pub job_repo: J,
}

impl<S, J> SavedHandler<S, J>
where
    S: SavedRepository,
    J: JobRepository,
{
    pub fn new(saved_repo: S, job_repo: J) -> Self {
        SavedHandler { saved_repo, job_repo }
    }

    pub async fn toggle_save(&self, user_id: &Uuid, job_id: &Uuid) -> Result<ToggleSaveResponse, AppError> {
        if self.job_repo.get_job(job_id).await?.is_none() {
            return Err(AppError::NotFound(JOB_NOT_FOUND_MESSAGE.to_string()));
        }

        let is_saved = self.saved_repo.toggle_saved(user_id, job_id).await?;
        tracing::debug!(user_id = %user_id, job_id = %job_id, is_saved, "Saved job toggled");

        Ok(ToggleSaveResponse { is_saved })
    }

    /// Which of `job_ids` the caller bookmarked. Anonymous callers have none.
    pub async fn saved_ids(&self, user_id: Option<Uuid>, job_ids: &[Uuid]) -> Result<Vec<Uuid>, AppError> {
        match user_id {
            Some(user_id) => self.saved_repo.saved_job_ids(&user_id, job_ids).await,
            None => Ok(Vec::new()),
        }
    }

    pub async fn saved_jobs(&self, user_id: &Uuid, query: &ListQuery) -> Result<SavedJobsResponse, AppError> {
        let now = Utc::now();
        let filter = ListFilter::from_query(query)?;

        let total = self.saved_repo.count_saved(user_id, &filter).await?;
        let request = PageRequest::resolve(query.page.as_deref(), total, SAVED_PER_PAGE);
        let rows = self
            .saved_repo
            .list_saved(user_id, &filter, request.limit(), request.offset())
            .await?;

        let job_ids = rows.iter().map(|row| row.job_id).collect();
        let saved = Page::new(rows, request, total).map(|row| row.to_item(now));

        Ok(SavedJobsResponse { saved, job_ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use crate::entities::job::{Job, JobStatus, PayType, WorkType, Workplace};
    use crate::entities::saved::SavedJobRow;
    use crate::repositories::{job::MockJobRepository, saved::MockSavedRepository};

    fn job(id: Uuid) -> Job {
        Job {
            id,
            employer_id: Uuid::new_v4(),
            status: JobStatus::Active,
            title: "Support Intern".into(),
            location: "Davao".into(),
            workplace: Workplace::Hybrid,
            work_type: WorkType::Part,
            pay_type: PayType::Hourly,
            pay_min: Decimal::from(100),
            pay_max: Decimal::from(150),
            job_description: "<p>Help</p>".into(),
            summary: None,
            created_at: Utc::now(),
            company_name: None,
        }
    }

    fn row(job_id: Uuid) -> SavedJobRow {
        SavedJobRow {
            saved_at: Utc::now(),
            job_id,
            title: "Support Intern".into(),
            company_name: Some("Acme".into()),
            location: "Davao".into(),
            status: JobStatus::Active,
            workplace: Workplace::Hybrid,
            work_type: WorkType::Part,
            pay_min: Decimal::from(100),
            pay_max: Decimal::from(1500),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn saving_a_missing_job_is_not_found() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_get_job().returning(|_| Ok(None));
        let mut saved = MockSavedRepository::new();
        saved.expect_toggle_saved().never();

        let handler = SavedHandler::new(saved, jobs);
        let result = handler.toggle_save(&Uuid::new_v4(), &Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn toggle_reports_the_new_state() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_get_job().returning(|id| Ok(Some(job(*id))));
        let mut saved = MockSavedRepository::new();
        saved.expect_toggle_saved().returning(|_, _| Ok(true));

        let handler = SavedHandler::new(saved, jobs);
        let response = handler.toggle_save(&Uuid::new_v4(), &Uuid::new_v4()).await.unwrap();

        assert_eq!(response, ToggleSaveResponse { is_saved: true });
    }

    #[tokio::test]
    async fn anonymous_callers_have_no_saved_ids() {
        let mut saved = MockSavedRepository::new();
        saved.expect_saved_job_ids().never();

        let handler = SavedHandler::new(saved, MockJobRepository::new());
        let ids = handler.saved_ids(None, &[Uuid::new_v4()]).await.unwrap();

        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn saved_jobs_list_the_ids_on_the_page() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let mut saved = MockSavedRepository::new();
        saved.expect_count_saved().returning(|_, _| Ok(2));
        saved.expect_list_saved()
            .returning(move |_, _, _, _| Ok(vec![row(first), row(second)]));

        let handler = SavedHandler::new(saved, MockJobRepository::new());
        let response = handler.saved_jobs(&Uuid::new_v4(), &ListQuery::default()).await.unwrap();

        assert_eq!(response.job_ids, vec![first, second]);
        assert_eq!(response.saved.items[1].salary_display, "100 - 1k");
        assert_eq!(response.saved.total_pages, 1);
    }
}
