use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::Level;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// The user-facing message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Internal(msg)
            | AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::ExternalService(msg) => msg,
        }
    }

    /// Server-side failures are errors; a rejected request is routine.
    pub fn log_level(&self) -> Level {
        if self.status().is_server_error() {
            Level::ERROR
        } else {
            Level::DEBUG
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.log_level() == Level::ERROR {
            tracing::error!("Error: {}: {}", status, self.message());
        } else {
            tracing::debug!("Rejected request: {}: {}", status, self.message());
        }

        let body = Json(json!({
            "error": self.message()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Auth("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::ExternalService("x".into()).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_message_has_no_prefix() {
        let err = AppError::NotFound("Doctor not found".into());
        assert_eq!(err.message(), "Doctor not found");
        assert_eq!(err.to_string(), "Not Found: Doctor not found");
    }

    #[test]
    fn test_only_server_errors_log_at_error_level() {
        assert_eq!(AppError::Auth("Please sign in to continue".into()).log_level(), Level::DEBUG);
        assert_eq!(AppError::ValidationError("x".into()).log_level(), Level::DEBUG);
        assert_eq!(AppError::ExternalService("x".into()).log_level(), Level::ERROR);
        assert_eq!(AppError::Internal("x".into()).log_level(), Level::ERROR);
    }
}
