use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use tracing::instrument;

use crate::{
    entities::job::{JobListResponse, JobRequest, JobSearchQuery, ListQuery},
    errors::AppError,
    use_cases::extractors::{EmployerClaims, MaybeClaims},
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[instrument(skip(claims, state, query))]
pub async fn list_jobs(
    claims: MaybeClaims,
    state: web::Data<AppState>,
    query: web::Query<JobSearchQuery>,
) -> Result<impl Responder, AppError> {
    let jobs = state.job_handler.list_jobs(&query).await?;

    let ids: Vec<_> = jobs.items.iter().map(|job| job.id).collect();
    let saved_job_ids = state.saved_handler.saved_ids(claims.user_id(), &ids).await?;

    Ok(HttpResponse::Ok().json(JobListResponse { jobs, saved_job_ids }))
}

#[instrument(skip(claims, state))]
pub async fn job_detail(
    claims: MaybeClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&job_id)?;
    let job = state.job_handler.get_job(&id).await?;

    let has_applied = match claims.0.as_ref().filter(|c| c.is_student()) {
        Some(student) => {
            state
                .application_handler
                .has_applied(&id, &student.user_id()?)
                .await?
        }
        None => false,
    };

    Ok(HttpResponse::Ok().json(job.to_detail_response(has_applied, Utc::now())))
}

#[instrument(skip(claims, state, data))]
pub async fn create_job(
    claims: EmployerClaims,
    state: web::Data<AppState>,
    data: web::Json<JobRequest>,
) -> Result<impl Responder, AppError> {
    let employer_id = claims.0.user_id()?;
    let job = state.job_handler.create_job(&employer_id, data.into_inner()).await?;
    Ok(HttpResponse::Created().json(job))
}

#[instrument(skip(claims, state, data))]
pub async fn edit_job(
    claims: EmployerClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
    data: web::Json<JobRequest>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&job_id)?;
    let employer_id = claims.0.user_id()?;
    let job = state.job_handler.edit_job(&id, &employer_id, data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[instrument(skip(claims, state, query))]
pub async fn my_jobs(
    claims: EmployerClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let employer_id = claims.0.user_id()?;
    let jobs = state.job_handler.my_jobs(&employer_id, &query).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[instrument(skip(claims, state))]
pub async fn toggle_job_status(
    claims: EmployerClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&job_id)?;
    let employer_id = claims.0.user_id()?;
    let response = state.job_handler.toggle_job_status(&id, &employer_id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(claims, state))]
pub async fn delete_job(
    claims: EmployerClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&job_id)?;
    let employer_id = claims.0.user_id()?;
    state.job_handler.delete_job(&id, &employer_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
