use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::job::JobStatus;

pub const APPLICATIONS_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Rejected,
    Accepted,
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    pub resume: Option<String>,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationInsert {
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub resume: String,
}

/// One row of a student's "applied jobs" page.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AppliedJobItem {
    pub application_id: Uuid,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub job_id: Uuid,
    pub job_title: String,
    pub job_status: JobStatus,
    pub location: String,
    pub company_name: Option<String>,
}

/// One applicant as seen by the employer who owns the job.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ApplicantItem {
    pub application_id: Uuid,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub has_resume: bool,
    pub applicant_id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub school: Option<String>,
    pub course: Option<String>,
}

// ───── Input ────────────────────────────────────────────────────────

#[derive(Debug, MultipartForm)]
pub struct ResumeUpload {
    #[multipart(rename = "resume")]
    pub resume: TempFile,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApplicationCreatedResponse {
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: ApplicationStatus,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct JobApplicationsResponse {
    pub job_id: Uuid,
    pub job_title: String,
    pub applications: Vec<ApplicantItem>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationStatusResponse {
    pub id: Uuid,
    pub status: ApplicationStatus,
}

impl From<Application> for ApplicationStatusResponse {
    fn from(application: Application) -> Self {
        ApplicationStatusResponse {
            id: application.id,
            status: application.status,
        }
    }
}
