use crate::repositories::user_repository::RepositoryError;
use crate::services::user_service::UserServiceError;
use crate::services::validation::FieldError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Failures surfaced to API clients.
///
/// | Variant           | Status |
/// |-------------------|--------|
/// | Validation        | 400    |
/// | InvalidIdentifier | 400    |
/// | NotFound          | 404    |
/// | DuplicateEmail    | 409    |
/// | EmptyResult       | 404    |
/// | Unexpected        | 500    |
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Invalid user ID")]
    InvalidIdentifier,

    #[error("User not found")]
    NotFound,

    #[error("User with this email already exists")]
    DuplicateEmail,

    #[error("No users found to export")]
    EmptyResult,

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidIdentifier => StatusCode::BAD_REQUEST,
            AppError::NotFound | AppError::EmptyResult => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::Validation(errors) => AppError::Validation(errors),
            UserServiceError::InvalidIdentifier => AppError::InvalidIdentifier,
            UserServiceError::UserNotFound => AppError::NotFound,
            UserServiceError::EmailTaken => AppError::DuplicateEmail,
            UserServiceError::EmptyResult => AppError::EmptyResult,
            UserServiceError::RepositoryError(RepositoryError::AlreadyExists) => {
                AppError::DuplicateEmail
            }
            UserServiceError::RepositoryError(e) => AppError::Unexpected(e.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Unexpected(err.to_string())
    }
}

static EXPOSE_ERROR_DETAILS: AtomicBool = AtomicBool::new(false);

/// Controls whether 500 responses carry the underlying error under `"error"`.
/// Set once at startup from [`crate::config::ServerConfig::is_development`].
pub fn expose_error_details(enabled: bool) {
    EXPOSE_ERROR_DETAILS.store(enabled, Ordering::Relaxed);
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body: Value = match self {
            AppError::Validation(errors) => json!({
                "success": false,
                "message": "Validation failed",
                "errors": errors,
            }),
            AppError::Unexpected(detail) => {
                tracing::error!("Unhandled error: {}", detail);
                let mut body = json!({
                    "success": false,
                    "message": "Something went wrong!",
                });
                if EXPOSE_ERROR_DETAILS.load(Ordering::Relaxed) {
                    body["error"] = Value::String(detail);
                }
                body
            }
            other => json!({
                "success": false,
                "message": other.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use serial_test::serial;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    #[serial]
    async fn unset_environment_exposes_error_details() {
        let saved_env = std::env::var("ENVIRONMENT").ok();
        let saved_url = std::env::var("DATABASE_URL").ok();
        std::env::remove_var("ENVIRONMENT");
        std::env::set_var("DATABASE_URL", "sqlite::memory:");

        let config = ServerConfig::from_env().unwrap();
        expose_error_details(config.is_development());

        let (status, body) = render(AppError::Unexpected("disk I/O error".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Something went wrong!");
        assert_eq!(body["error"], "disk I/O error");

        expose_error_details(false);
        if let Some(value) = saved_env {
            std::env::set_var("ENVIRONMENT", value);
        }
        match saved_url {
            Some(value) => std::env::set_var("DATABASE_URL", value),
            None => std::env::remove_var("DATABASE_URL"),
        }
    }

    #[tokio::test]
    #[serial]
    async fn production_hides_error_details() {
        expose_error_details(false);

        let (_, body) = render(AppError::Unexpected("disk I/O error".to_string())).await;
        assert_eq!(body["success"], false);
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn validation_body_lists_field_errors() {
        let (status, body) = render(AppError::Validation(vec![FieldError {
            field: "email",
            message: "Please provide a valid email".to_string(),
        }]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "email");
    }

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::Validation(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidIdentifier.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::EmptyResult.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Unexpected("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn service_errors_map_to_nearest_kind() {
        assert!(matches!(
            AppError::from(UserServiceError::EmailTaken),
            AppError::DuplicateEmail
        ));
        assert!(matches!(
            AppError::from(UserServiceError::RepositoryError(RepositoryError::AlreadyExists)),
            AppError::DuplicateEmail
        ));
        assert!(matches!(
            AppError::from(UserServiceError::RepositoryError(RepositoryError::Database(
                sqlx::Error::PoolClosed
            ))),
            AppError::Unexpected(_)
        ));
    }
}
