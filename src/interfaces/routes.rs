use actix_web::web;

use crate::handlers::{home::home, system::health_check};

mod auth;
mod jobs;
mod profile;
mod student;
mod employer;
mod payload_errors;

pub fn configure_routes(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope("/api/v1")
            .configure(auth::config_routes)
            .configure(jobs::config_routes)
            .configure(profile::config_routes)
            .configure(student::config_routes)
            .configure(employer::config_routes)
    );

    payload_errors::config_routes(cfg, max_upload_bytes);
}
