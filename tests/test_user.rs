use chrono::Utc;
use jobboard_backend::entities::user::{LoginUser, NewUser, Role, User};
use serde_json::{json, Value};
use uuid::Uuid;

pub const STRONG_PASSWORD: &str = "Tr1cky#Lantern!";

/// Smallest file that sniffs as a PDF.
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\ntrailer\n<<>>\n%%EOF\n";

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

pub fn new_user(role: Role) -> NewUser {
    NewUser {
        email: unique_email(role.as_str()),
        role,
        password: STRONG_PASSWORD.to_string(),
        password_confirm: STRONG_PASSWORD.to_string(),
    }
}

pub fn login_for(user: &NewUser) -> LoginUser {
    LoginUser {
        email: user.email.clone(),
        password: user.password.clone(),
    }
}

/// A user row as the token service sees it. Never stored.
#[allow(dead_code)]
pub fn token_user(role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        email: unique_email(role.as_str()),
        password_hash: String::new(),
        role,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[allow(dead_code)]
pub fn employer_profile_body() -> Value {
    json!({
        "company_name": "Acme Software",
        "phone": "0912 345 6789",
        "company_address": "Malolos, Bulacan",
        "industry": "Software",
        "company_size": "11-50",
        "description": "We build tools for schools."
    })
}

#[allow(dead_code)]
pub fn job_body(title: &str) -> Value {
    json!({
        "title": title,
        "location": "Malolos, Bulacan",
        "workplace": "hybrid",
        "work_type": "internship",
        "pay_type": "monthly",
        "pay_min": "15000",
        "pay_max": "20000",
        "job_description": "<p>Help us <b>ship</b></p><script>alert(1)</script>",
        "summary": "Paid internship"
    })
}
