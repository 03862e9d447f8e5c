use std::borrow::Cow;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    entities::pagination::Page,
    utils::{humanize::{format_salary, time_ago}, rich_text::sanitize_rich_text},
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: u64 = 200;
const MAX_LOCATION_LENGTH: u64 = 150;
const MIN_PAY: i64 = 1;
const MAX_PAY: i64 = 4_000_000;
const PAY_DECIMAL_PLACES: u32 = 2;

pub const JOBS_PER_PAGE: u32 = 20;
pub const MY_JOBS_PER_PAGE: u32 = 10;
pub const FEATURED_JOBS: u32 = 9;

// ───── Choices ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "workplace", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Workplace {
    Onsite,
    Hybrid,
    Remote,
}

impl Workplace {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "onsite" => Some(Workplace::Onsite),
            "hybrid" => Some(Workplace::Hybrid),
            "remote" => Some(Workplace::Remote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "work_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    Internship,
    Full,
    Part,
    Contract,
    Casual,
}

impl WorkType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "internship" => Some(WorkType::Internship),
            "full" => Some(WorkType::Full),
            "part" => Some(WorkType::Part),
            "contract" => Some(WorkType::Contract),
            "casual" => Some(WorkType::Casual),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "pay_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PayType {
    Hourly,
    Monthly,
    Annual,
    AnnualPlus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Closed,
}

impl JobStatus {
    /// "expired" was the old name for a closed posting.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(JobStatus::Active),
            "closed" | "expired" => Some(JobStatus::Closed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Closed => "closed",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            JobStatus::Active => JobStatus::Closed,
            JobStatus::Closed => JobStatus::Active,
        }
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub status: JobStatus,
    pub title: String,
    pub location: String,
    pub workplace: Workplace,
    pub work_type: WorkType,
    pub pay_type: PayType,
    pub pay_min: Decimal,
    pub pay_max: Decimal,
    pub job_description: String,
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobWithCount {
    #[sqlx(flatten)]
    pub job: Job,
    pub application_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobInsert {
    pub employer_id: Uuid,
    pub title: String,
    pub location: String,
    pub workplace: Workplace,
    pub work_type: WorkType,
    pub pay_type: PayType,
    pub pay_min: Decimal,
    pub pay_max: Decimal,
    pub job_description: String,
    pub summary: Option<String>,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobRequest {
    #[validate(length(min = 1, max = MAX_TITLE_LENGTH, message = "Title is required (max 200 characters)"))]
    pub title: String,

    #[validate(length(min = 1, max = MAX_LOCATION_LENGTH, message = "Location is required (max 150 characters)"))]
    pub location: String,

    pub workplace: Workplace,
    pub work_type: WorkType,
    pub pay_type: PayType,

    #[validate(custom(function = "validate_pay_amount"))]
    pub pay_min: Decimal,

    #[validate(custom(function = "validate_pay_amount"))]
    pub pay_max: Decimal,

    #[validate(length(min = 1, message = "Job description is required"))]
    pub job_description: String,

    #[serde(default)]
    pub summary: Option<String>,
}

pub fn validate_pay_amount(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::from(MIN_PAY) || *value > Decimal::from(MAX_PAY) {
        return Err(new_validation_error("pay_out_of_range", "Pay must be between 1 and 4,000,000"));
    }
    if value.round_dp(PAY_DECIMAL_PLACES) != *value {
        return Err(new_validation_error("pay_precision", "Pay can have at most 2 decimal places"));
    }
    Ok(())
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

impl JobRequest {
    /// Strips surrounding whitespace so the length checks see what gets stored.
    pub fn trimmed(self) -> Self {
        JobRequest {
            title: self.title.trim().to_string(),
            location: self.location.trim().to_string(),
            summary: self
                .summary
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            ..self
        }
    }
}

impl JobInsert {
    /// Validates the posting form and prepares it for storage under `employer_id`.
    pub fn from_request(request: JobRequest, employer_id: Uuid) -> Result<Self, ValidationErrors> {
        let request = request.trimmed();
        request.validate()?;

        if request.pay_min > request.pay_max {
            let mut errors = ValidationErrors::new();
            errors.add(
                "pay_max",
                new_validation_error("pay_range", "Maximum pay must not be lower than minimum pay"),
            );
            return Err(errors);
        }

        let job_description = sanitize_rich_text(&request.job_description);
        if job_description.trim().is_empty() {
            let mut errors = ValidationErrors::new();
            errors.add(
                "job_description",
                new_validation_error("description_empty", "Job description is required"),
            );
            return Err(errors);
        }

        Ok(JobInsert {
            employer_id,
            title: request.title,
            location: request.location,
            workplace: request.workplace,
            work_type: request.work_type,
            pay_type: request.pay_type,
            pay_min: request.pay_min,
            pay_max: request.pay_max,
            job_description,
            summary: request.summary,
        })
    }
}

// ───── Filters ──────────────────────────────────────────────────────

/// Raw query string of the public job search.
#[derive(Debug, Default, Deserialize)]
pub struct JobSearchQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub workplace: Option<String>,
    pub work_type: Option<String>,
    pub date_posted: Option<String>,
    pub page: Option<String>,
}

/// Raw query string shared by the "my jobs", "applied" and "saved" listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePosted {
    Today,
    LastDays(i64),
}

impl DatePosted {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "today" => Some(DatePosted::Today),
            "3days" => Some(DatePosted::LastDays(3)),
            "7days" => Some(DatePosted::LastDays(7)),
            "14days" => Some(DatePosted::LastDays(14)),
            "30days" => Some(DatePosted::LastDays(30)),
            _ => None,
        }
    }

    /// Earliest `created_at` that passes the filter, counted from UTC midnight.
    pub fn since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or(now);

        match self {
            DatePosted::Today => midnight,
            DatePosted::LastDays(days) => midnight - Duration::days(*days),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub workplace: Option<Workplace>,
    pub work_type: Option<WorkType>,
    pub posted_since: Option<DateTime<Utc>>,
}

impl JobFilter {
    pub fn from_query(query: &JobSearchQuery, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let workplace = match non_empty(&query.workplace) {
            Some(value) => match Workplace::parse(&value) {
                Some(w) => Some(w),
                None => {
                    errors.add("workplace", new_validation_error("invalid_choice", "Select a valid workplace"));
                    None
                }
            },
            None => None,
        };

        let work_type = match non_empty(&query.work_type) {
            Some(value) => match WorkType::parse(&value) {
                Some(w) => Some(w),
                None => {
                    errors.add("work_type", new_validation_error("invalid_choice", "Select a valid work type"));
                    None
                }
            },
            None => None,
        };

        if !errors.field_errors().is_empty() {
            return Err(errors);
        }

        Ok(JobFilter {
            search: non_empty(&query.search),
            location: non_empty(&query.location),
            workplace,
            work_type,
            posted_since: non_empty(&query.date_posted)
                .and_then(|v| DatePosted::parse(&v))
                .map(|d| d.since(now)),
        })
    }
}

/// Search + job status filter of the personal listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub search: Option<String>,
    pub status: Option<JobStatus>,
}

impl ListFilter {
    pub fn from_query(query: &ListQuery) -> Result<Self, ValidationErrors> {
        let status = match non_empty(&query.status) {
            Some(value) => match JobStatus::parse(&value) {
                Some(s) => Some(s),
                None => {
                    let mut errors = ValidationErrors::new();
                    errors.add("status", new_validation_error("invalid_choice", "Select a valid status"));
                    return Err(errors);
                }
            },
            None => None,
        };

        Ok(ListFilter { search: non_empty(&query.search), status })
    }
}

pub fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct JobListItem {
    pub id: Uuid,
    pub title: String,
    pub company_name: Option<String>,
    pub location: String,
    pub workplace: Workplace,
    pub work_type: WorkType,
    pub pay_type: PayType,
    pub pay_min: Decimal,
    pub pay_max: Decimal,
    pub salary_display: String,
    pub summary: Option<String>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub posted_ago: String,
}

#[derive(Debug, Serialize)]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub job: JobListItem,
    pub job_description: String,
    pub has_applied: bool,
}

#[derive(Debug, Serialize)]
pub struct EmployerJobItem {
    #[serde(flatten)]
    pub job: JobListItem,
    pub application_count: i64,
}

/// Public job board page. `saved_job_ids` lists which of these the caller bookmarked.
#[derive(Debug, Serialize)]
pub struct JobListResponse {
    #[serde(flatten)]
    pub jobs: Page<JobListItem>,
    pub saved_job_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub id: Uuid,
    pub status: JobStatus,
    pub message: String,
}

impl Job {
    pub fn salary_display(&self) -> String {
        format!("{} - {}", format_salary(self.pay_min), format_salary(self.pay_max))
    }

    pub fn to_list_item(&self, now: DateTime<Utc>) -> JobListItem {
        JobListItem {
            id: self.id,
            title: self.title.clone(),
            company_name: self.company_name.clone(),
            location: self.location.clone(),
            workplace: self.workplace,
            work_type: self.work_type,
            pay_type: self.pay_type,
            pay_min: self.pay_min,
            pay_max: self.pay_max,
            salary_display: self.salary_display(),
            summary: self.summary.clone(),
            status: self.status,
            created_at: self.created_at,
            posted_ago: time_ago(self.created_at, now),
        }
    }

    pub fn to_detail_response(&self, has_applied: bool, now: DateTime<Utc>) -> JobDetailResponse {
        JobDetailResponse {
            job: self.to_list_item(now),
            job_description: self.job_description.clone(),
            has_applied,
        }
    }
}

impl JobWithCount {
    pub fn to_employer_item(&self, now: DateTime<Utc>) -> EmployerJobItem {
        EmployerJobItem {
            job: self.job.to_list_item(now),
            application_count: self.application_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> JobRequest {
        JobRequest {
            title: " Software Developer Intern ".into(),
            location: "Malolos, Bulacan".into(),
            workplace: Workplace::Hybrid,
            work_type: WorkType::Internship,
            pay_type: PayType::Monthly,
            pay_min: Decimal::from(15_000),
            pay_max: Decimal::from(20_000),
            job_description: "<p>Build <b>things</b></p><script>alert(1)</script>".into(),
            summary: Some("   ".into()),
        }
    }

    #[test]
    fn insert_trims_sanitizes_and_drops_blank_summary() {
        let employer = Uuid::new_v4();
        let insert = JobInsert::from_request(request(), employer).unwrap();

        assert_eq!(insert.employer_id, employer);
        assert_eq!(insert.title, "Software Developer Intern");
        assert!(!insert.job_description.contains("<script>"));
        assert!(insert.job_description.contains("<b>things</b>"));
        assert_eq!(insert.summary, None);
    }

    #[test]
    fn pay_must_be_in_range_and_ordered() {
        let too_high = JobRequest { pay_max: Decimal::from(4_000_001), ..request() };
        let errors = JobInsert::from_request(too_high, Uuid::new_v4()).unwrap_err();
        assert!(errors.field_errors().contains_key("pay_max"));

        let inverted = JobRequest { pay_min: Decimal::from(30_000), ..request() };
        let errors = JobInsert::from_request(inverted, Uuid::new_v4()).unwrap_err();
        assert!(errors.field_errors().contains_key("pay_max"));

        let precise = JobRequest { pay_min: Decimal::new(1_0001, 3), ..request() };
        let errors = JobInsert::from_request(precise, Uuid::new_v4()).unwrap_err();
        assert!(errors.field_errors().contains_key("pay_min"));
    }

    #[test]
    fn blank_title_and_location_are_rejected() {
        let blank = JobRequest { title: "   ".into(), location: "\t ".into(), ..request() };
        let errors = JobInsert::from_request(blank, Uuid::new_v4()).unwrap_err();

        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("location"));
    }

    #[test]
    fn length_limits_apply_after_trimming() {
        let padded_title = format!("   {}   ", "a".repeat(200));
        let request = JobRequest { title: padded_title, ..request() };
        let insert = JobInsert::from_request(request, Uuid::new_v4()).unwrap();
        assert_eq!(insert.title.len(), 200);

        let too_long = JobRequest { title: "a".repeat(201), ..self::request() };
        assert!(JobInsert::from_request(too_long, Uuid::new_v4()).is_err());
    }

    #[test]
    fn description_that_sanitizes_to_nothing_is_rejected() {
        let script_only = JobRequest { job_description: "<script>alert(1)</script>".into(), ..request() };
        let errors = JobInsert::from_request(script_only, Uuid::new_v4()).unwrap_err();
        assert!(errors.field_errors().contains_key("job_description"));
    }

    #[test]
    fn date_posted_counts_from_utc_midnight() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 15, 30, 0).unwrap();

        assert_eq!(
            DatePosted::Today.since(now),
            Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap()
        );
        assert_eq!(
            DatePosted::parse("7days").unwrap().since(now),
            Utc.with_ymd_and_hms(2024, 5, 13, 0, 0, 0).unwrap()
        );
        assert_eq!(DatePosted::parse("yesterday"), None);
    }

    #[test]
    fn job_filter_ignores_blank_values_and_rejects_bad_choices() {
        let now = Utc::now();
        let query = JobSearchQuery {
            search: Some("  ".into()),
            location: Some(" Bulacan ".into()),
            workplace: Some(String::new()),
            work_type: Some("full".into()),
            date_posted: Some("forever".into()),
            page: None,
        };
        let filter = JobFilter::from_query(&query, now).unwrap();
        assert_eq!(filter.search, None);
        assert_eq!(filter.location.as_deref(), Some("Bulacan"));
        assert_eq!(filter.workplace, None);
        assert_eq!(filter.work_type, Some(WorkType::Full));
        assert_eq!(filter.posted_since, None);

        let bad = JobSearchQuery { workplace: Some("moon".into()), ..Default::default() };
        let errors = JobFilter::from_query(&bad, now).unwrap_err();
        assert!(errors.field_errors().contains_key("workplace"));
    }

    #[test]
    fn status_toggles_and_accepts_legacy_expired() {
        assert_eq!(JobStatus::Active.toggled(), JobStatus::Closed);
        assert_eq!(JobStatus::Closed.toggled(), JobStatus::Active);
        assert_eq!(JobStatus::parse("expired"), Some(JobStatus::Closed));

        let filter = ListFilter::from_query(&ListQuery {
            status: Some("expired".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(filter.status, Some(JobStatus::Closed));
    }

    #[test]
    fn pay_type_uses_kebab_case() {
        assert_eq!(serde_json::to_string(&PayType::AnnualPlus).unwrap(), "\"annual-plus\"");
    }
}
