use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::job::ListQuery,
    errors::AppError,
    use_cases::extractors::{AuthClaims, StudentClaims},
    utils::valid_uuid::valid_uuid,
    AppState,
};

#[instrument(skip(claims, state))]
pub async fn toggle_save(
    claims: AuthClaims,
    job_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let id = valid_uuid(&job_id)?;
    let user_id = claims.0.user_id()?;
    let response = state.saved_handler.toggle_save(&user_id, &id).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(claims, state, query))]
pub async fn saved_jobs(
    claims: StudentClaims,
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, AppError> {
    let user_id = claims.0.user_id()?;
    let response = state.saved_handler.saved_jobs(&user_id, &query).await?;
    Ok(HttpResponse::Ok().json(response))
}
