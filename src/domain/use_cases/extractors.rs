use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::{entities::{token::Claims, user::Role}, errors::AuthError};

/// Extractor for authenticated claims, ensuring the user is authenticated.
/// Returns 401 if the user is not authenticated.
/// Usage: Add `claims: AuthClaims` as a parameter to your handler function.
#[derive(Debug)]
pub struct AuthClaims(pub Claims);

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthClaims(claims.clone()))),
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}

/// Claims on public routes, present only when the caller sent a valid token.
#[derive(Debug)]
pub struct MaybeClaims(pub Option<Claims>);

impl MaybeClaims {
    pub fn user_id(&self) -> Option<Uuid> {
        self.0.as_ref().and_then(|claims| claims.user_id().ok())
    }
}

impl FromRequest for MaybeClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(MaybeClaims(req.extensions().get::<Claims>().cloned())))
    }
}

fn claims_with_role(req: &HttpRequest, role: Role) -> Result<Claims, AuthError> {
    match req.extensions().get::<Claims>() {
        Some(claims) if claims.role == role => Ok(claims.clone()),
        Some(_) => Err(AuthError::Forbidden(format!("{role} access required"))),
        None => Err(AuthError::MissingCredentials),
    }
}

/// Extractor for student claims.
/// Returns 403 for employers and 401 if the user is not authenticated.
#[derive(Debug)]
pub struct StudentClaims(pub Claims);

impl FromRequest for StudentClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(claims_with_role(req, Role::Student).map(StudentClaims).map_err(Into::into))
    }
}

/// Extractor for employer claims.
/// Returns 403 for students and 401 if the user is not authenticated.
#[derive(Debug)]
pub struct EmployerClaims(pub Claims);

impl FromRequest for EmployerClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(claims_with_role(req, Role::Employer).map(EmployerClaims).map_err(Into::into))
    }
}
