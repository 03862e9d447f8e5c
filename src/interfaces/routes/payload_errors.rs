use actix_multipart::form::MultipartFormConfig;
use actix_web::web;

use crate::handlers::payload_error::{
    json_error_handler, multipart_error_handler, path_error_handler, query_error_handler,
};

/// Multipart bodies carry a little framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn config_routes(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(
            MultipartFormConfig::default()
                .total_limit(max_upload_bytes + MULTIPART_OVERHEAD)
                .error_handler(multipart_error_handler),
        );
}
