//! Errors returned to HTTP clients.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use casa_core::constants::PREDICTION_FAILED;
use serde::{Deserialize, Serialize};

/// Error body: `{"detail": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable message
    pub detail: String,
}

/// Failure of an API call
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Normalization or inference failed; the cause is logged, never returned
    #[error("{}", PREDICTION_FAILED)]
    PredictionFailed,
    /// Request body could not be parsed
    #[error("{0}")]
    InvalidRequest(String),
    /// Metrics could not be rendered
    #[error("Metrics encoding failed")]
    Metrics,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PredictionFailed | Self::Metrics => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            detail: self.to_string(),
        })
    }
}
