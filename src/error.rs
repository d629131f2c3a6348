//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::errors::ForwardingError;

/// Message returned when the database segment of the path is unknown.
pub const DATABASE_NOT_FOUND_MESSAGE: &str = "Database name not found in configuration";

/// Message returned when no record carries the requested key.
pub const ITEM_NOT_FOUND_MESSAGE: &str = "Item ID not found";

/// Errors returned by HTTP handlers.
///
/// Rendered as a plain-text body with the matching status code.
#[derive(Debug)]
pub enum AppError {
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ForwardingError> for AppError {
    fn from(e: ForwardingError) -> Self {
        match e {
            ForwardingError::DatabaseNotFound(_) => AppError::not_found(DATABASE_NOT_FOUND_MESSAGE),
            ForwardingError::ItemNotFound { .. } => AppError::not_found(ITEM_NOT_FOUND_MESSAGE),
            other => AppError::internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::NotFound { message } | AppError::Internal { message } => message,
        };

        if status.is_server_error() {
            tracing::error!(%status, "{}", message);
        }

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::SourceError;

    #[test]
    fn test_not_found_mapping() {
        let err = AppError::from(ForwardingError::DatabaseNotFound("x".to_string()));
        assert!(
            matches!(err, AppError::NotFound { ref message } if message == DATABASE_NOT_FOUND_MESSAGE)
        );

        let err = AppError::from(ForwardingError::ItemNotFound {
            database: "tasks".to_string(),
            key: "abc".to_string(),
        });
        assert!(
            matches!(err, AppError::NotFound { ref message } if message == ITEM_NOT_FOUND_MESSAGE)
        );
    }

    #[test]
    fn test_internal_mapping_keeps_message() {
        let err = AppError::from(ForwardingError::SourceUnavailable(SourceError::Unavailable(
            "timeout".to_string(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(err, AppError::Internal { ref message } if message.contains("timeout")));

        let err = AppError::from(ForwardingError::UnsupportedFieldType {
            field: "slug".to_string(),
            kind: "number".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
