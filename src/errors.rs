// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum FoodMapError {
    #[error("Scored corpus not available: {hint}")]
    CorpusUnavailable { hint: String },

    #[error("Invalid value for filter '{field}': {message}")]
    InvalidFilter { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Internal server error")]
    #[allow(dead_code)]
    InternalError,
}

impl FoodMapError {
    /// Convenience constructor for invalid query-filter values
    pub fn invalid_filter(field: &str, message: impl Into<String>) -> Self {
        FoodMapError::InvalidFilter {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Convert FoodMapError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for FoodMapError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = match self {
            FoodMapError::CorpusUnavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "CORPUS_UNAVAILABLE")
            }
            FoodMapError::InvalidFilter { .. } => (StatusCode::BAD_REQUEST, "INVALID_FILTER"),
            FoodMapError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            FoodMapError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            FoodMapError::DataError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATA_ERROR"),
            FoodMapError::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let mut body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        // Structured detail: the offending field for bad filters, the missing
        // upstream stage for 503s.
        match self {
            FoodMapError::InvalidFilter { field, .. } => {
                body["error"]["field"] = json!(field);
            }
            FoodMapError::CorpusUnavailable { hint } => {
                body["error"]["hint"] = json!(hint);
            }
            _ => {}
        }

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            FoodMapError::CorpusUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            FoodMapError::InvalidFilter { .. } => StatusCode::BAD_REQUEST,
            FoodMapError::ValidationError(_) => StatusCode::BAD_REQUEST,
            FoodMapError::Unauthorized => StatusCode::UNAUTHORIZED,
            FoodMapError::DataError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            FoodMapError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
