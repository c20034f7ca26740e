use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::envelope::ErrorBody;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
pub const UPSTREAM_ERROR_MESSAGE: &str = "Upstream API error";
pub const FEEDBACK_ERROR_MESSAGE: &str = "Failed to send feedback. Please try again later.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The upstream answered with a non-success status
    #[error("Upstream returned {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    /// No response was received from the upstream
    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Mail delivery error: {0}")]
    Mail(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the failure happened before any response was received and is
    /// worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Timeout => true,
            AppError::Transport(e) => {
                e.status().is_none() && (e.is_timeout() || e.is_connect() || e.is_request())
            }
            _ => false,
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the caller
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Upstream { message, .. } => message.clone(),
            AppError::Mail(_) => FEEDBACK_ERROR_MESSAGE.to_string(),
            _ => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        let body = Json(ErrorBody {
            message: self.public_message(),
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_maps_to_bad_request() {
        let err = AppError::InvalidInput("A valid numeric ID is required".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "A valid numeric ID is required");
    }

    #[test]
    fn test_upstream_status_is_mirrored() {
        let err = AppError::Upstream {
            status: StatusCode::NOT_FOUND,
            message: "The resource you requested could not be found.".to_string(),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            err.public_message(),
            "The resource you requested could not be found."
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AppError::Internal("connection pool exhausted".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);

        let err = AppError::Mail("resend said no".to_string());
        assert_eq!(err.public_message(), FEEDBACK_ERROR_MESSAGE);
    }

    #[test]
    fn test_transient_classification() {
        assert!(AppError::Timeout.is_transient());
        assert!(!AppError::InvalidInput("x".to_string()).is_transient());
        assert!(!AppError::Upstream {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "down".to_string(),
        }
        .is_transient());
    }
}
