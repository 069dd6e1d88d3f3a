use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recetario_core::{ServiceError, UploadError, ValidationError};

use super::ErrorResponse;

/// An error response: status plus the `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Map a service failure. Rejected uploads keep their message; anything else is logged
    /// and replaced by `context`.
    pub fn service(err: ServiceError, context: &str) -> Self {
        match err {
            ServiceError::Upload(upload) if upload.is_rejection() => {
                tracing::warn!("Rejected upload: {}", upload);
                Self::bad_request(upload.to_string())
            }
            ServiceError::Upload(UploadError::Storage(msg)) => {
                tracing::error!("{}: upload failed: {}", context, msg);
                Self::internal(context)
            }
            other => {
                tracing::error!("{}: {}", context, other);
                Self::internal(context)
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recetario_core::StoreError;

    #[test]
    fn test_service_error_mapping() {
        let rejected = ApiError::service(
            ServiceError::Upload(UploadError::UnsupportedFormat("Gif".to_string())),
            "Failed to create recipe",
        );
        assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
        assert!(rejected.message.contains("Gif"));

        let storage = ApiError::service(
            ServiceError::Storage(StoreError::Unavailable("down".to_string())),
            "Failed to create recipe",
        );
        assert_eq!(storage.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.message, "Failed to create recipe");

        let io = ApiError::service(
            ServiceError::Upload(UploadError::Storage("disk full".to_string())),
            "Failed to update recipe",
        );
        assert_eq!(io.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!io.message.contains("disk"));
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err: ApiError = ValidationError::BlankTitle.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Title cannot be empty");
    }
}
