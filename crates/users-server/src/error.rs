use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use users_shared::api::ErrorResponse;

use crate::validation::ValidationErrors;

pub const VALIDATION_FAILED: &str = "Input payload validation failed";
pub const DUPLICATE_EMAIL: &str = "Sorry. That email already exists.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Input payload validation failed")]
    Validation(ValidationErrors),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn duplicate_email() -> Self {
        AppError::Conflict(DUPLICATE_EMAIL.to_string())
    }

    pub fn user_not_found(user_id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("User {user_id} does not exist"))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                VALIDATION_FAILED.to_string(),
                errors.into_map(),
            ),
            // Duplicate emails are reported as a bad request, not 409.
            AppError::Conflict(msg) => (StatusCode::BAD_REQUEST, msg, Default::default()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Default::default()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                    Default::default(),
                )
            }
        };

        (status, Json(ErrorResponse { message, errors })).into_response()
    }
}
