use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    cache::redis::{is_token_revoked, ACCESS_DENY_PREFIX},
    entities::{token::Claims, user::Role},
    errors::AuthError,
    repositories::token::TokenServiceRepository,
    AppState,
};

pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let path = req.path().to_string();
            let public = is_public_route(&path, req.method().as_str());

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in middleware");
                return Ok(reject(req, AuthError::MissingJwtService));
            };

            let token = extract_token(&req);

            if public {
                // Public pages personalise themselves when a usable token comes along.
                if let Some(token) = token {
                    if let Ok(claims) = verify_token(&state, &token).await {
                        req.extensions_mut().insert(claims);
                    }
                }
                return service.call(req).await;
            }

            let Some(token) = token else {
                tracing::warn!(path = %path, "Missing or malformed Authorization header");
                return Ok(reject(req, AuthError::MissingCredentials));
            };

            let claims = match verify_token(&state, &token).await {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::warn!(path = %path, "Rejected access token: {}", e);
                    return Ok(reject(req, e));
                }
            };

            if let Err(e) = enforce_role_access(&path, &claims) {
                tracing::warn!(path = %path, role = %claims.role, "Role not allowed for path");
                return Ok(reject(req, e));
            }

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

/// Routes reachable without a token. OPTIONS always passes for CORS preflight.
pub fn is_public_route(path: &str, method: &str) -> bool {
    if method == "OPTIONS" {
        return true;
    }

    match (path, method) {
        ("/", "GET") | ("/health", "GET") => true,
        ("/api/v1/auth/register", "POST")
        | ("/api/v1/auth/login", "POST")
        | ("/api/v1/auth/refresh-token", "POST") => true,
        ("/api/v1/jobs", "GET") => true,
        (_, "GET") => path
            .strip_prefix("/api/v1/jobs/")
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/')),
        _ => false,
    }
}

/// Role required by the path prefix, if any.
pub fn required_role(path: &str) -> Option<Role> {
    if path.starts_with("/api/v1/student/") {
        Some(Role::Student)
    } else if path.starts_with("/api/v1/employer/") {
        Some(Role::Employer)
    } else {
        None
    }
}

pub fn extract_token_from_header(header: &str) -> Option<String> {
    let parts: Vec<&str> = header.split_whitespace().collect();
    if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
        Some(parts[1].to_string())
    } else {
        None
    }
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(extract_token_from_header)
}

async fn verify_token(state: &web::Data<AppState>, token: &str) -> Result<Claims, AuthError> {
    let claims = state.auth_handler.token_service.decode_jwt(token)?.claims;

    if let Some(redis_pool) = &state.redis_pool {
        let revoked = is_token_revoked(redis_pool, ACCESS_DENY_PREFIX, token)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Deny list lookup failed: {}", e);
                false
            });

        if revoked {
            return Err(AuthError::TokenRevoked);
        }
    }

    Ok(claims)
}

fn enforce_role_access(path: &str, claims: &Claims) -> Result<(), AuthError> {
    match required_role(path) {
        Some(role) if claims.role != role => {
            Err(AuthError::Forbidden(format!("{role} access required")))
        }
        _ => Ok(()),
    }
}

fn reject(req: ServiceRequest, err: AuthError) -> ServiceResponse<BoxBody> {
    req.into_response(err.error_response())
}
