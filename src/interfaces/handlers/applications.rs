use actix_multipart::form::MultipartForm;
use actix_web::{http::header, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        application::{ApplicationStatus, ResumeUpload},
        job::ListQuery,
    },
    errors::AppError,
    use_cases::extractors::{EmployerClaims, StudentClaims},
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[instrument(skip(claims, state, form))]
pub async fn apply_job(
    claims: StudentClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
    form: MultipartForm<ResumeUpload>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&job_id)?;
    let applicant_id = claims.0.user_id()?;

    let response = state
        .application_handler
        .apply(&id, &applicant_id, form.resume.file.path())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(claims, state, query))]
pub async fn applied_jobs(
    claims: StudentClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let applicant_id = claims.0.user_id()?;
    let page = state.application_handler.applied_jobs(&applicant_id, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

#[instrument(skip(claims, state))]
pub async fn view_applications(
    claims: EmployerClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&job_id)?;
    let employer_id = claims.0.user_id()?;
    let response = state.application_handler.view_applications(&id, &employer_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

async fn set_status(
    claims: EmployerClaims,
    application_id: &str,
    state: &AppState,
    status: ApplicationStatus,
) -> Result<HttpResponse, AppError> {
    let id = valid_uuid(application_id)?;
    let employer_id = claims.0.user_id()?;
    let response = state.application_handler.set_status(&id, &employer_id, status).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(claims, state))]
pub async fn accept_application(
    claims: EmployerClaims,
    application_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    set_status(claims, &application_id, &state, ApplicationStatus::Accepted).await
}

#[instrument(skip(claims, state))]
pub async fn reject_application(
    claims: EmployerClaims,
    application_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    set_status(claims, &application_id, &state, ApplicationStatus::Rejected).await
}

#[instrument(skip(claims, state))]
pub async fn download_resume(
    claims: EmployerClaims,
    application_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&application_id)?;
    let employer_id = claims.0.user_id()?;
    let file = state.application_handler.download_resume(&id, &employer_id).await?;

    Ok(HttpResponse::Ok()
        .content_type(file.content_type)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        ))
        .body(file.bytes))
}
