use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::entities::token::RefreshTokenRequest;
use crate::entities::user::{LoginUser, LogoutRequest, NewUser};
use crate::errors::AuthError;
use crate::middlewares::auth::extract_token_from_header;
use crate::AppState;

#[post("/register")]
#[instrument(skip(state, user))]
pub async fn register(
    state: web::Data<AppState>,
    user: web::Json<NewUser>
) -> impl Responder {
    match state.auth_handler.register(user.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[post("/login")]
#[instrument(skip(state, user))]
pub async fn login(
    state: web::Data<AppState>,
    user: web::Json<LoginUser>
) -> Result<impl Responder, AuthError> {
    let response = state.auth_handler.login(user.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/refresh-token")]
#[instrument(skip(state, request))]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<impl Responder, AuthError> {
    let response = state
        .auth_handler
        .refresh_token(&request.refresh_token, state.redis_pool.as_ref())
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[post("/logout")]
#[instrument(skip(request, state, body))]
pub async fn logout(
    request: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LogoutRequest>
) -> Result<impl Responder, AuthError> {
    let access_token = request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(extract_token_from_header)
        .ok_or(AuthError::MissingCredentials)?;

    state
        .auth_handler
        .logout(&access_token, &body.refresh_token, state.redis_pool.as_ref())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Logged out successfully"})))
}
