use actix_multipart::form::MultipartForm;
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::profile::{ProfileImageUpload, UpdateEmployerProfileRequest, UpdateStudentProfileRequest},
    errors::AppError,
    use_cases::extractors::{AuthClaims, EmployerClaims, StudentClaims},
    AppState,
};

#[instrument(skip(claims, state))]
pub async fn get_profile(
    claims: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let profile = state.profile_handler.get_profile(&claims.0).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(claims, state, data))]
pub async fn update_student_profile(
    claims: StudentClaims,
    state: web::Data<AppState>,
    data: web::Json<UpdateStudentProfileRequest>,
) -> Result<impl Responder, AppError> {
    let profile = state
        .profile_handler
        .update_student_profile(&claims.0, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(claims, state, data))]
pub async fn update_employer_profile(
    claims: EmployerClaims,
    state: web::Data<AppState>,
    data: web::Json<UpdateEmployerProfileRequest>,
) -> Result<impl Responder, AppError> {
    let profile = state
        .profile_handler
        .update_employer_profile(&claims.0, data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[instrument(skip(claims, state, form))]
pub async fn upload_profile_image(
    claims: AuthClaims,
    state: web::Data<AppState>,
    form: MultipartForm<ProfileImageUpload>,
) -> Result<impl Responder, AppError> {
    let response = state
        .profile_handler
        .upload_profile_image(&claims.0, form.image.file.path())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}
