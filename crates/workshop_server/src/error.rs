//! HTTP error type bridging service errors to JSON responses.
//!
//! Every failure is rendered as `{"error": "<message>"}`. Server-side
//! failures are logged with their source; client errors are not.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;
use std::fmt;
use workshop_core::{RegistrationError, UserServiceError, WorkshopServiceError};

/// Application error type for handlers.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    /// User-facing message.
    message: String,
    /// Internal cause, logged but never sent to the client.
    source: Option<anyhow::Error>,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            match &self.source {
                Some(source) => error!(
                    "event=http_error module=server status={} message={} error={:#}",
                    self.status.as_u16(),
                    self.message,
                    source
                ),
                None => error!(
                    "event=http_error module=server status={} message={}",
                    self.status.as_u16(),
                    self.message
                ),
            }
        }

        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<RegistrationError> for AppError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::Validation(_) | RegistrationError::DuplicateRegistration { .. } => {
                Self::bad_request(err.to_string())
            }
            RegistrationError::WorkshopNotFound(_)
            | RegistrationError::RegistrationNotFound { .. } => Self::not_found(err.to_string()),
            RegistrationError::Store(_) => {
                Self::internal("Registration store failure").with_source(err.into())
            }
        }
    }
}

impl From<WorkshopServiceError> for AppError {
    fn from(err: WorkshopServiceError) -> Self {
        match err {
            WorkshopServiceError::Validation(_) => Self::bad_request(err.to_string()),
            WorkshopServiceError::WorkshopNotFound(_) => Self::not_found(err.to_string()),
            WorkshopServiceError::Repo(_) => {
                Self::internal("Workshop store failure").with_source(err.into())
            }
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Validation(_) | UserServiceError::EmailTaken(_) => {
                Self::bad_request(err.to_string())
            }
            UserServiceError::UserNotFound(_) => Self::not_found(err.to_string()),
            UserServiceError::Repo(_) => {
                Self::internal("User store failure").with_source(err.into())
            }
        }
    }
}
