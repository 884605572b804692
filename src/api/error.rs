use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use tracing::{error, warn};

use super::validation::ErrorResponse;
use crate::upstream::UpstreamError;

/// Service-level errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed input; nothing was mutated
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// A provider call failed or is not configured
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Provider failure reported with a hint on how to fix it
    #[error("{source}")]
    UpstreamWithNote {
        source: UpstreamError,
        note: &'static str,
    },
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Upstream(_) | ServiceError::UpstreamWithNote { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ServiceError::Validation(msg) => {
                warn!("Validation error: {}", msg);
                ErrorResponse::new(msg.clone())
            }
            ServiceError::NotFound(msg) => {
                warn!("Not found: {}", msg);
                ErrorResponse::new(msg.clone())
            }
            ServiceError::Unauthorized => {
                warn!("Rejected request with missing or invalid API key");
                ErrorResponse::new("Unauthorized")
            }
            ServiceError::Upstream(e) => {
                error!("Upstream error: {}", e);
                ErrorResponse::new(e.to_string())
            }
            ServiceError::UpstreamWithNote { source, note } => {
                error!("Upstream error: {}", source);
                ErrorResponse {
                    success: Some(false),
                    error: source.to_string(),
                    fields: None,
                    note: Some(note.to_string()),
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Reject absent or blank required fields
pub fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, ServiceError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::validation(message))
}
