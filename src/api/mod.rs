//! API module for the risk prediction service.
//!
//! Routes, request handlers and the HTTP mapping of service errors.

pub mod handlers;
pub mod routes;

pub use routes::configure;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::{RiskModel, ServiceError};

/// Application state shared by all request handlers: the classifier,
/// loaded once at startup and used read-only afterwards.
pub struct AppState {
    pub model: RiskModel,
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::ArtifactLoad { .. } | ServiceError::FeatureMismatch(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::Validation(err) => {
                tracing::debug!(field = err.field, "request rejected by validation");
                HttpResponse::BadRequest().json(err)
            }
            other => {
                tracing::error!(error = %other, "prediction request failed");
                HttpResponse::InternalServerError().json(json!({ "error": other.to_string() }))
            }
        }
    }
}
