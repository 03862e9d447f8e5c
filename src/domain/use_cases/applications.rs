use std::path::Path;

use uuid::Uuid;

use crate::{
    entities::{
        application::{
            ApplicationCreatedResponse, ApplicationInsert, ApplicationStatus, ApplicationStatusResponse,
            AppliedJobItem, JobApplicationsResponse, APPLICATIONS_PER_PAGE,
        },
        job::{JobStatus, ListFilter, ListQuery},
        pagination::{Page, PageRequest},
    },
    errors::AppError,
    repositories::{
        application::{ApplicationRepository, ALREADY_APPLIED_MESSAGE},
        job::JobRepository,
    },
    storage::media::{MediaFile, MediaKind, MediaStorage},
    use_cases::jobs::JOB_NOT_FOUND_MESSAGE,
};

pub const JOB_CLOSED_MESSAGE: &str = "This job is no longer accepting applications";
pub const APPLICATION_NOT_FOUND_MESSAGE: &str = "Application not found";

pub struct ApplicationHandler<A, J, M>
where
    A: ApplicationRepository,
    J: JobRepository,
    M: MediaStorage,
{
    pub application_repo: A,
    pub job_repo: J,
    pub media: M,
}

impl<A, J, M> ApplicationHandler<A, J, M>
where
    A: ApplicationRepository,
    J: JobRepository,
    M: MediaStorage,
{
    pub fn new(application_repo: A, job_repo: J, media: M) -> Self {
        ApplicationHandler { application_repo, job_repo, media }
    }

    /// Stores the uploaded resume and files a pending application.
    pub async fn apply(
        &self,
        job_id: &Uuid,
        applicant_id: &Uuid,
        resume: &Path,
    ) -> Result<ApplicationCreatedResponse, AppError> {
        let job = self
            .job_repo
            .get_job(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound(JOB_NOT_FOUND_MESSAGE.to_string()))?;

        if job.status != JobStatus::Active {
            return Err(AppError::Conflict(JOB_CLOSED_MESSAGE.to_string()));
        }
        if self.application_repo.has_applied(job_id, applicant_id).await? {
            return Err(AppError::Conflict(ALREADY_APPLIED_MESSAGE.to_string()));
        }

        let stored = self.media.store(MediaKind::Resume, resume).await?;
        let insert = ApplicationInsert {
            job_id: *job_id,
            applicant_id: *applicant_id,
            resume: stored.clone(),
        };

        let application = match self.application_repo.create_application(&insert).await {
            Ok(application) => application,
            Err(e) => {
                if let Err(cleanup) = self.media.remove(&stored).await {
                    tracing::warn!(path = %stored, "Failed to remove orphaned resume: {}", cleanup);
                }
                return Err(e);
            }
        };

        tracing::info!(application_id = %application.id, job_id = %job_id, "Application submitted");
        Ok(ApplicationCreatedResponse {
            id: application.id,
            job_id: application.job_id,
            status: application.status,
            message: "Application submitted successfully".to_string(),
        })
    }

    pub async fn has_applied(&self, job_id: &Uuid, applicant_id: &Uuid) -> Result<bool, AppError> {
        self.application_repo.has_applied(job_id, applicant_id).await
    }

    pub async fn applied_jobs(&self, applicant_id: &Uuid, query: &ListQuery) -> Result<Page<AppliedJobItem>, AppError> {
        let filter = ListFilter::from_query(query)?;

        let total = self.application_repo.count_applied(applicant_id, &filter).await?;
        let request = PageRequest::resolve(query.page.as_deref(), total, APPLICATIONS_PER_PAGE);
        let items = self
            .application_repo
            .list_applied(applicant_id, &filter, request.limit(), request.offset())
            .await?;

        Ok(Page::new(items, request, total))
    }

    /// Applicants of a job, visible only to the employer who posted it.
    pub async fn view_applications(&self, job_id: &Uuid, employer_id: &Uuid) -> Result<JobApplicationsResponse, AppError> {
        let job = self
            .job_repo
            .get_owned_job(job_id, employer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(JOB_NOT_FOUND_MESSAGE.to_string()))?;

        let applications = self.application_repo.list_for_job(job_id).await?;

        Ok(JobApplicationsResponse {
            job_id: job.id,
            job_title: job.title,
            applications,
        })
    }

    pub async fn set_status(
        &self,
        id: &Uuid,
        employer_id: &Uuid,
        status: ApplicationStatus,
    ) -> Result<ApplicationStatusResponse, AppError> {
        let application = self
            .application_repo
            .set_status_for_employer(id, employer_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(APPLICATION_NOT_FOUND_MESSAGE.to_string()))?;

        tracing::info!(application_id = %id, status = ?status, "Application status changed");
        Ok(application.into())
    }

    pub async fn download_resume(&self, id: &Uuid, employer_id: &Uuid) -> Result<MediaFile, AppError> {
        let application = self
            .application_repo
            .get_for_employer(id, employer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(APPLICATION_NOT_FOUND_MESSAGE.to_string()))?;

        let path = application
            .resume
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

        Ok(self.media.read(&path).await?)
    }
}
