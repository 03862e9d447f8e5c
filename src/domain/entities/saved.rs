use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    entities::{job::{JobStatus, WorkType, Workplace}, pagination::Page},
    utils::humanize::{format_salary, time_ago},
};

pub const SAVED_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SavedJobRow {
    pub saved_at: DateTime<Utc>,
    pub job_id: Uuid,
    pub title: String,
    pub company_name: Option<String>,
    pub location: String,
    pub status: JobStatus,
    pub workplace: Workplace,
    pub work_type: WorkType,
    pub pay_min: Decimal,
    pub pay_max: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SavedJobItem {
    pub job_id: Uuid,
    pub title: String,
    pub company_name: Option<String>,
    pub location: String,
    pub status: JobStatus,
    pub workplace: Workplace,
    pub work_type: WorkType,
    pub salary_display: String,
    pub posted_ago: String,
    pub saved_at: DateTime<Utc>,
}

impl SavedJobRow {
    pub fn to_item(&self, now: DateTime<Utc>) -> SavedJobItem {
        SavedJobItem {
            job_id: self.job_id,
            title: self.title.clone(),
            company_name: self.company_name.clone(),
            location: self.location.clone(),
            status: self.status,
            workplace: self.workplace,
            work_type: self.work_type,
            salary_display: format!("{} - {}", format_salary(self.pay_min), format_salary(self.pay_max)),
            posted_ago: time_ago(self.created_at, now),
            saved_at: self.saved_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SavedJobsResponse {
    #[serde(flatten)]
    pub saved: Page<SavedJobItem>,
    pub job_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToggleSaveResponse {
    pub is_saved: bool,
}
