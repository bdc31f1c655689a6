//! Unified error handling with Sentry integration.
//!
//! Every store error is converted to an HTTP status here; nothing propagates
//! past the handler boundary. Server-side failures are captured to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use user_service_core::{UserFieldsError, UserIdError};

use crate::db::RepositoryError;

/// Application-level error type for the user service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] RepositoryError),

    /// Path identifier is not a well-formed user ID.
    #[error("Invalid ID: {0}")]
    InvalidId(#[from] UserIdError),

    /// Request body does not describe a user.
    #[error("Invalid body: {0}")]
    InvalidBody(#[from] UserFieldsError),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
                RepositoryError::Unavailable(_) | RepositoryError::Timeout(_) => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                RepositoryError::DataCorruption(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InvalidId(_) | Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(RepositoryError::NotFound) => "User not found".to_string(),
            Self::Store(RepositoryError::InvalidArgument(msg)) => msg.clone(),
            Self::Store(RepositoryError::Unavailable(_) | RepositoryError::Timeout(_)) => {
                "Service unavailable".to_string()
            }
            Self::Store(RepositoryError::DataCorruption(_)) => "Internal server error".to_string(),
            Self::InvalidId(_) => "Invalid ID".to_string(),
            Self::InvalidBody(err) => err.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
