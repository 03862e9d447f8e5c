use actix_web::{get, web, HttpResponse};

use crate::{errors::AppError, AppState};

#[get("/")]
pub async fn home(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let featured_jobs = state.job_handler.featured_jobs().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the Job Board API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "featured_jobs": featured_jobs,
    })))
}
