use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("API key required")]
    ApiKeyMissing,
    #[error("Invalid API key")]
    Unauthorized,
    #[error("BadRequest: `{0}`")]
    BadRequest(String),
    #[error("`{0}` not found")]
    NotFound(String),
    #[error("Forbidden: `{0}`")]
    Forbidden(String),
    #[error("Conflict: `{0}`")]
    Conflict(String),
    #[error("The tracker is not connected")]
    TrackerNotConnected,
    #[error("The tracker command queue is full")]
    TrackerBusy,
    #[error("The tracker did not reply in time")]
    CommandTimeout,
    #[error("InternalError: `{0}`")]
    InternalError(String),
    #[error("DBError: `{0}`")]
    Storage(#[from] StorageError),
}

impl From<std::io::Error> for WebError {
    fn from(e: std::io::Error) -> Self {
        WebError::InternalError(e.to_string())
    }
}

impl ResponseError for WebError {
    fn error_response(&self) -> HttpResponse {
        // Same `{"result": ...}` shape the success envelope uses.
        let body = json!({ "result": self.to_string() });
        match self {
            WebError::ApiKeyMissing | WebError::BadRequest(_) => {
                HttpResponse::BadRequest().json(body)
            }
            WebError::Unauthorized => HttpResponse::Unauthorized().json(body),
            WebError::NotFound(_) => HttpResponse::NotFound().json(body),
            WebError::Forbidden(_) => HttpResponse::Forbidden().json(body),
            WebError::Conflict(_) => HttpResponse::Conflict().json(body),
            WebError::TrackerNotConnected | WebError::TrackerBusy => {
                HttpResponse::ServiceUnavailable().json(body)
            }
            WebError::CommandTimeout => HttpResponse::GatewayTimeout().json(body),
            WebError::InternalError(_) | WebError::Storage(_) => {
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}
