//! Event domain error types

use axum_helpers::AppError;
use std::fmt;

/// Result type for event operations
pub type Result<T> = std::result::Result<T, EventError>;

/// Event domain errors
#[derive(Debug)]
pub enum EventError {
    /// Event not found
    NotFound { id: String },

    /// Identifier is not a well-formed ObjectId
    InvalidId { value: String },

    /// Request input is missing or malformed
    Validation { message: String },

    /// MongoDB error
    Database {
        message: String,
        source: Option<mongodb::error::Error>,
    },

    /// Image store error
    Storage { message: String },
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { id } => write!(f, "Event not found: {}", id),
            Self::InvalidId { value } => write!(f, "Invalid event id: {}", value),
            Self::Validation { message } => write!(f, "Validation error: {}", message),
            Self::Database { message, .. } => write!(f, "Database error: {}", message),
            Self::Storage { message } => write!(f, "Storage error: {}", message),
        }
    }
}

impl std::error::Error for EventError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database {
                source: Some(e), ..
            } => Some(e),
            _ => None,
        }
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<mongodb::bson::ser::Error> for EventError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        Self::Database {
            message: format!("BSON serialization error: {}", err),
            source: None,
        }
    }
}

impl From<mongodb::bson::de::Error> for EventError {
    fn from(err: mongodb::bson::de::Error) -> Self {
        Self::Database {
            message: format!("BSON deserialization error: {}", err),
            source: None,
        }
    }
}

impl From<axum::extract::rejection::QueryRejection> for EventError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        Self::Validation {
            message: err.body_text(),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for EventError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Self::Validation {
            message: format!("malformed multipart body: {}", err.body_text()),
        }
    }
}

// Convert to axum_helpers::AppError for HTTP responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound { id } => AppError::NotFound(format!("Event not found: {}", id)),
            EventError::InvalidId { value } => {
                AppError::BadRequest(format!("Invalid event id: {}", value))
            }
            EventError::Validation { message } => AppError::BadRequest(message),
            EventError::Database { message, .. } => AppError::InternalServerError(message),
            EventError::Storage { message } => AppError::InternalServerError(message),
        }
    }
}

impl axum::response::IntoResponse for EventError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
