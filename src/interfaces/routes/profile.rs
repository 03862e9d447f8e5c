use actix_web::web;

use crate::handlers::profile;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/profile")
            .service(
                web::resource("")
                    .route(web::get().to(profile::get_profile))
            )
            .service(
                web::resource("/image")
                    .route(web::post().to(profile::upload_profile_image))
            )
    );
}
