use actix_web::web;

use crate::handlers::{applications, profile};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/student")
            .service(
                web::resource("/profile")
                    .route(web::put().to(profile::update_student_profile))
            )
            .service(
                web::resource("/jobs/{job_id}/apply")
                    .route(web::post().to(applications::apply_job))
            )
            .service(
                web::resource("/applications")
                    .route(web::get().to(applications::applied_jobs))
            )
    );
}
