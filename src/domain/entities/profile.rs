use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::user::Role;

// ───── Choices ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "year_level")]
pub enum YearLevel {
    #[sqlx(rename = "1")]
    #[serde(rename = "1")]
    First,
    #[sqlx(rename = "2")]
    #[serde(rename = "2")]
    Second,
    #[sqlx(rename = "3")]
    #[serde(rename = "3")]
    Third,
    #[sqlx(rename = "4")]
    #[serde(rename = "4")]
    Fourth,
    #[sqlx(rename = "graduate")]
    #[serde(rename = "graduate")]
    Graduate,
}

impl YearLevel {
    pub fn label(&self) -> &'static str {
        match self {
            YearLevel::First => "1st Year",
            YearLevel::Second => "2nd Year",
            YearLevel::Third => "3rd Year",
            YearLevel::Fourth => "4th Year",
            YearLevel::Graduate => "Graduate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "company_size")]
pub enum CompanySize {
    #[sqlx(rename = "1-10")]
    #[serde(rename = "1-10")]
    Micro,
    #[sqlx(rename = "11-50")]
    #[serde(rename = "11-50")]
    Small,
    #[sqlx(rename = "51-200")]
    #[serde(rename = "51-200")]
    Medium,
    #[sqlx(rename = "201-500")]
    #[serde(rename = "201-500")]
    Large,
    #[sqlx(rename = "500+")]
    #[serde(rename = "500+")]
    Enterprise,
}

impl CompanySize {
    pub fn label(&self) -> &'static str {
        match self {
            CompanySize::Micro => "1-10 employees",
            CompanySize::Small => "11-50 employees",
            CompanySize::Medium => "51-200 employees",
            CompanySize::Large => "201-500 employees",
            CompanySize::Enterprise => "500+ employees",
        }
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
pub struct StudentProfile {
    pub user_id: Uuid,
    pub profile_img: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub school: String,
    pub course: String,
    pub year_level: Option<YearLevel>,
    pub skills: String,
    pub bio: String,
}

impl StudentProfile {
    /// Skills are entered as one comma separated string.
    pub fn skills_list(&self) -> Vec<String> {
        self.skills
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        [&self.first_name, &self.last_name, &self.phone, &self.school, &self.course]
            .iter()
            .all(|f| !f.trim().is_empty())
            && self.year_level.is_some()
    }
}

#[derive(Debug, Clone, Default, Serialize, sqlx::FromRow)]
pub struct EmployerProfile {
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub logo: Option<String>,
    pub phone: String,
    pub company_address: String,
    pub industry: String,
    pub company_size: Option<CompanySize>,
    pub description: String,
}

impl EmployerProfile {
    /// An employer may only post jobs once every company field is filled in.
    pub fn is_complete(&self) -> bool {
        [
            &self.company_name,
            &self.phone,
            &self.company_address,
            &self.industry,
            &self.description,
        ]
        .iter()
        .all(|f| !f.trim().is_empty())
            && self.company_size.is_some()
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateStudentProfileRequest {
    #[validate(length(min = 1, max = 50, message = "First name is required (max 50 characters)"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50, message = "Last name is required (max 50 characters)"))]
    pub last_name: String,

    #[validate(length(min = 1, max = 20, message = "Phone is required (max 20 characters)"))]
    pub phone: String,

    #[validate(length(min = 1, max = 200, message = "School is required (max 200 characters)"))]
    pub school: String,

    #[validate(length(min = 1, max = 200, message = "Course is required (max 200 characters)"))]
    pub course: String,

    pub year_level: YearLevel,

    #[serde(default)]
    pub skills: String,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateEmployerProfileRequest {
    #[serde(default)]
    #[validate(length(max = 50))]
    pub first_name: String,

    #[serde(default)]
    #[validate(length(max = 50))]
    pub last_name: String,

    #[validate(length(min = 1, max = 200, message = "Company name is required (max 200 characters)"))]
    pub company_name: String,

    #[validate(length(min = 1, max = 20, message = "Phone is required"))]
    pub phone: String,

    #[validate(length(min = 1, max = 300, message = "Company address is required (max 300 characters)"))]
    pub company_address: String,

    #[validate(length(min = 1, max = 100, message = "Industry is required (max 100 characters)"))]
    pub industry: String,

    pub company_size: CompanySize,

    #[validate(length(min = 1, max = 1000, message = "Description is required (max 1000 characters)"))]
    pub description: String,
}

fn trim(value: &str) -> String {
    value.trim().to_string()
}

impl UpdateStudentProfileRequest {
    /// Strips surrounding whitespace so blank fields fail the required checks.
    pub fn trimmed(self) -> Self {
        UpdateStudentProfileRequest {
            first_name: trim(&self.first_name),
            last_name: trim(&self.last_name),
            phone: trim(&self.phone),
            school: trim(&self.school),
            course: trim(&self.course),
            skills: trim(&self.skills),
            bio: trim(&self.bio),
            ..self
        }
    }
}

impl UpdateEmployerProfileRequest {
    pub fn trimmed(self) -> Self {
        UpdateEmployerProfileRequest {
            first_name: trim(&self.first_name),
            last_name: trim(&self.last_name),
            company_name: trim(&self.company_name),
            phone: trim(&self.phone),
            company_address: trim(&self.company_address),
            industry: trim(&self.industry),
            description: trim(&self.description),
            ..self
        }
    }
}

/// Employer fields after the phone has been normalized.
#[derive(Debug, Clone)]
pub struct EmployerProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub phone: String,
    pub company_address: String,
    pub industry: String,
    pub company_size: CompanySize,
    pub description: String,
}

#[derive(Debug, MultipartForm)]
pub struct ProfileImageUpload {
    #[multipart(rename = "image")]
    pub image: TempFile,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProfileImageResponse {
    pub role: Role,
    pub path: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProfileDetails {
    Student(StudentProfile),
    Employer(EmployerProfile),
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub email: String,
    pub role: Role,
    pub complete: bool,
    pub profile: ProfileDetails,
}

impl ProfileResponse {
    pub fn student(email: String, profile: StudentProfile) -> Self {
        ProfileResponse {
            email,
            role: Role::Student,
            complete: profile.is_complete(),
            profile: ProfileDetails::Student(profile),
        }
    }

    pub fn employer(email: String, profile: EmployerProfile) -> Self {
        ProfileResponse {
            email,
            role: Role::Employer,
            complete: profile.is_complete(),
            profile: ProfileDetails::Employer(profile),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_employer() -> EmployerProfile {
        EmployerProfile {
            company_name: "Acme".into(),
            phone: "+63 912 345 6789".into(),
            company_address: "Malolos, Bulacan".into(),
            industry: "IT".into(),
            company_size: Some(CompanySize::Small),
            description: "We build things".into(),
            ..Default::default()
        }
    }

    #[test]
    fn employer_profile_completeness_needs_every_company_field() {
        assert!(complete_employer().is_complete());

        let missing_size = EmployerProfile { company_size: None, ..complete_employer() };
        assert!(!missing_size.is_complete());

        let blank_industry = EmployerProfile { industry: "   ".into(), ..complete_employer() };
        assert!(!blank_industry.is_complete());
    }

    #[test]
    fn skills_are_split_on_commas() {
        let profile = StudentProfile {
            skills: "Python, HTML,, Communication ".into(),
            ..Default::default()
        };
        assert_eq!(profile.skills_list(), vec!["Python", "HTML", "Communication"]);
    }

    #[test]
    fn choices_use_their_stored_values() {
        assert_eq!(serde_json::to_string(&YearLevel::Graduate).unwrap(), "\"graduate\"");
        assert_eq!(serde_json::to_string(&CompanySize::Enterprise).unwrap(), "\"500+\"");
        let level: YearLevel = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(level, YearLevel::Third);
        assert_eq!(level.label(), "3rd Year");
    }

    #[test]
    fn student_update_limits_bio_length() {
        let request = UpdateStudentProfileRequest {
            first_name: "Ana".into(),
            last_name: "Cruz".into(),
            phone: "0912 345 6789".into(),
            school: "BulSU".into(),
            course: "BSIT".into(),
            year_level: YearLevel::Fourth,
            skills: String::new(),
            bio: "x".repeat(1001),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("bio"));
    }

    #[test]
    fn whitespace_only_student_fields_are_missing() {
        let request = UpdateStudentProfileRequest {
            first_name: "   ".into(),
            last_name: "\t".into(),
            phone: "0912 345 6789".into(),
            school: " \n ".into(),
            course: "BSIT".into(),
            year_level: YearLevel::First,
            skills: String::new(),
            bio: String::new(),
        }
        .trimmed();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("last_name"));
        assert!(fields.contains_key("school"));
        assert!(!fields.contains_key("course"));
    }

    #[test]
    fn whitespace_only_company_fields_are_missing() {
        let request = UpdateEmployerProfileRequest {
            first_name: String::new(),
            last_name: String::new(),
            company_name: "  ".into(),
            phone: "0912 345 6789".into(),
            company_address: "\t".into(),
            industry: " ".into(),
            company_size: CompanySize::Small,
            description: "   ".into(),
        }
        .trimmed();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["company_name", "company_address", "industry", "description"] {
            assert!(fields.contains_key(field), "{field}");
        }
    }

    #[test]
    fn padding_does_not_count_toward_length_limits() {
        let request = UpdateStudentProfileRequest {
            first_name: format!("  {}  ", "a".repeat(50)),
            last_name: "Cruz".into(),
            phone: "0912 345 6789".into(),
            school: "BulSU".into(),
            course: "BSIT".into(),
            year_level: YearLevel::Second,
            skills: String::new(),
            bio: String::new(),
        }
        .trimmed();

        assert!(request.validate().is_ok());
        assert_eq!(request.first_name.len(), 50);
    }
}
