use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    /// Client-caused: bad format, oversized file, malformed form.
    #[error("{0}")]
    ValidationError(String),
    /// Non-success code or missing image in the vendor response.
    #[error("{0}")]
    VendorError(String),
    #[error("{0}")]
    RequestError(String),
    #[error("{0}")]
    ResponseError(String),
    #[error("{0}")]
    SerializationError(String),
    #[error("{0}")]
    InternalError(String),
}

impl RelayError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, RelayError::ValidationError(_))
    }
}

impl ResponseError for RelayError {
    fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            detail: self.to_string(),
        })
    }
}

impl From<actix_multipart::MultipartError> for RelayError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        RelayError::ValidationError(format!("Invalid multipart form: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
