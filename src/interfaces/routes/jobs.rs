use actix_web::web;

use crate::handlers::{jobs, saved};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/jobs")
            .service(
                web::resource("")
                    .route(web::get().to(jobs::list_jobs))
            )
            .service(
                web::resource("/{job_id}")
                    .route(web::get().to(jobs::job_detail))
            )
            .service(
                web::resource("/{job_id}/save")
                    .route(web::post().to(saved::toggle_save))
            )
    )
    .service(
        web::resource("/saved-jobs")
            .route(web::get().to(saved::saved_jobs))
    );
}
