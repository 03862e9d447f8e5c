use actix_multipart::MultipartError;
use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use serde_json::json;

/// Extractor failure rendered in the same `{"error": ...}` shape as `AppError`.
#[derive(Debug)]
pub struct PayloadError {
    message: String,
    status: StatusCode,
}

impl PayloadError {
    fn bad_request(message: String) -> Self {
        PayloadError { message, status: StatusCode::BAD_REQUEST }
    }
}

impl std::fmt::Display for PayloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for PayloadError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status).json(json!({ "error": self.message }))
    }
}

impl From<JsonPayloadError> for PayloadError {
    fn from(err: JsonPayloadError) -> Self {
        match err {
            JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => PayloadError {
                message: format!("JSON payload error: {}", err),
                status: StatusCode::PAYLOAD_TOO_LARGE,
            },
            _ => PayloadError::bad_request(format!("JSON payload error: {}", err)),
        }
    }
}

impl From<QueryPayloadError> for PayloadError {
    fn from(err: QueryPayloadError) -> Self {
        PayloadError::bad_request(format!("Query error: {}", err))
    }
}

impl From<PathError> for PayloadError {
    fn from(err: PathError) -> Self {
        PayloadError::bad_request(format!("Path error: {}", err))
    }
}

impl From<MultipartError> for PayloadError {
    fn from(err: MultipartError) -> Self {
        let status = match err.status_code() {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        PayloadError { message: format!("Upload error: {}", err), status }
    }
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    PayloadError::from(err).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    PayloadError::from(err).into()
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    PayloadError::from(err).into()
}

pub fn multipart_error_handler(err: MultipartError, _req: &HttpRequest) -> actix_web::Error {
    PayloadError::from(err).into()
}
