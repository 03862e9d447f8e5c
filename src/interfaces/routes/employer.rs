use actix_web::web;

use crate::handlers::{applications, jobs, profile};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/employer")
            .service(
                web::resource("/profile")
                    .route(web::put().to(profile::update_employer_profile))
            )
            .service(
                web::resource("/jobs")
                    .route(web::get().to(jobs::my_jobs))
                    .route(web::post().to(jobs::create_job))
            )
            .service(
                web::resource("/jobs/{job_id}")
                    .route(web::put().to(jobs::edit_job))
                    .route(web::delete().to(jobs::delete_job))
            )
            .service(
                web::resource("/jobs/{job_id}/toggle-status")
                    .route(web::post().to(jobs::toggle_job_status))
            )
            .service(
                web::resource("/jobs/{job_id}/applications")
                    .route(web::get().to(applications::view_applications))
            )
            .service(
                web::resource("/applications/{application_id}/accept")
                    .route(web::post().to(applications::accept_application))
            )
            .service(
                web::resource("/applications/{application_id}/reject")
                    .route(web::post().to(applications::reject_application))
            )
            .service(
                web::resource("/applications/{application_id}/resume")
                    .route(web::get().to(applications::download_resume))
            )
    );
}
