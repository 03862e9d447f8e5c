use chrono::Utc;
use uuid::Uuid;

use crate::{
    entities::{
        job::{
            EmployerJobItem, Job, JobDetailResponse, JobFilter, JobInsert, JobListItem, JobRequest,
            JobSearchQuery, JobStatusResponse, ListFilter, ListQuery, FEATURED_JOBS, JOBS_PER_PAGE,
            MY_JOBS_PER_PAGE,
        },
        pagination::{Page, PageRequest},
    },
    errors::AppError,
    repositories::{job::JobRepository, profile::ProfileRepository},
};

pub const PROFILE_INCOMPLETE_MESSAGE: &str = "Please complete your employer profile before creating a job.";
pub const JOB_NOT_FOUND_MESSAGE: &str = "Job not found";

pub struct JobHandler<J, P>
where
    J: JobRepository,
    P: ProfileRepository,
{
    pub job_repo: J,
    pub profile_repo: P,
}

impl<J, P> JobHandler<J, P>
where
    J: JobRepository,
    P: ProfileRepository,
{
    pub fn new(job_repo: J, profile_repo: P) -> Self {
        JobHandler { job_repo, profile_repo }
    }

    /// Newest active postings for the landing page.
    pub async fn featured_jobs(&self) -> Result<Vec<JobListItem>, AppError> {
        let now = Utc::now();
        let jobs = self.job_repo.featured_jobs(FEATURED_JOBS as i64).await?;
        Ok(jobs.iter().map(|job| job.to_list_item(now)).collect())
    }

    /// Public, filtered and paginated list of active jobs.
    pub async fn list_jobs(&self, query: &JobSearchQuery) -> Result<Page<JobListItem>, AppError> {
        let now = Utc::now();
        let filter = JobFilter::from_query(query, now)?;

        let total = self.job_repo.count_active_jobs(&filter).await?;
        let request = PageRequest::resolve(query.page.as_deref(), total, JOBS_PER_PAGE);
        let jobs = self
            .job_repo
            .list_active_jobs(&filter, request.limit(), request.offset())
            .await?;

        Ok(Page::new(jobs, request, total).map(|job| job.to_list_item(now)))
    }

    pub async fn get_job(&self, id: &Uuid) -> Result<Job, AppError> {
        self.job_repo
            .get_job(id)
            .await?
            .ok_or_else(|| AppError::NotFound(JOB_NOT_FOUND_MESSAGE.to_string()))
    }

    /// A job owned by `employer_id`. Other employers' jobs are reported as missing.
    pub async fn get_owned_job(&self, id: &Uuid, employer_id: &Uuid) -> Result<Job, AppError> {
        self.job_repo
            .get_owned_job(id, employer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(JOB_NOT_FOUND_MESSAGE.to_string()))
    }

    pub async fn create_job(&self, employer_id: &Uuid, request: JobRequest) -> Result<JobDetailResponse, AppError> {
        let profile = self.profile_repo.get_or_create_employer_profile(employer_id).await?;
        if !profile.is_complete() {
            return Err(AppError::ProfileIncomplete(PROFILE_INCOMPLETE_MESSAGE.to_string()));
        }

        let insert = JobInsert::from_request(request, *employer_id)?;
        let job = self.job_repo.create_job(&insert).await?;

        tracing::info!(job_id = %job.id, employer_id = %employer_id, "Job posted");
        Ok(job.to_detail_response(false, Utc::now()))
    }

    pub async fn edit_job(
        &self,
        id: &Uuid,
        employer_id: &Uuid,
        request: JobRequest,
    ) -> Result<JobDetailResponse, AppError> {
        let insert = JobInsert::from_request(request, *employer_id)?;
        let job = self
            .job_repo
            .update_job(id, employer_id, &insert)
            .await?
            .ok_or_else(|| AppError::NotFound(JOB_NOT_FOUND_MESSAGE.to_string()))?;

        tracing::info!(job_id = %job.id, "Job updated");
        Ok(job.to_detail_response(false, Utc::now()))
    }

    pub async fn my_jobs(&self, employer_id: &Uuid, query: &ListQuery) -> Result<Page<EmployerJobItem>, AppError> {
        let now = Utc::now();
        let filter = ListFilter::from_query(query)?;

        let total = self.job_repo.count_employer_jobs(employer_id, &filter).await?;
        let request = PageRequest::resolve(query.page.as_deref(), total, MY_JOBS_PER_PAGE);
        let jobs = self
            .job_repo
            .list_employer_jobs(employer_id, &filter, request.limit(), request.offset())
            .await?;

        Ok(Page::new(jobs, request, total).map(|job| job.to_employer_item(now)))
    }

    /// Flips an owned job between active and closed.
    pub async fn toggle_job_status(&self, id: &Uuid, employer_id: &Uuid) -> Result<JobStatusResponse, AppError> {
        let job = self.get_owned_job(id, employer_id).await?;
        let status = job.status.toggled();

        let updated = self
            .job_repo
            .set_job_status(id, employer_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(JOB_NOT_FOUND_MESSAGE.to_string()))?;

        tracing::info!(job_id = %id, status = updated.status.as_str(), "Job status changed");
        Ok(JobStatusResponse {
            id: updated.id,
            status: updated.status,
            message: format!("Job '{}' is now {}", updated.title, updated.status.as_str()),
        })
    }

    pub async fn delete_job(&self, id: &Uuid, employer_id: &Uuid) -> Result<(), AppError> {
        if !self.job_repo.delete_job(id, employer_id).await? {
            return Err(AppError::NotFound(JOB_NOT_FOUND_MESSAGE.to_string()));
        }
        tracing::info!(job_id = %id, "Job deleted");
        Ok(())
    }
}
