use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

use crate::utils::helpers::service_name;

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Not Found: {0}")]
    NotFoundError(String),

    #[error("Validation Error: {0}")]
    ValidationError(String),

    /// A storage uniqueness constraint rejected the write.
    #[error("Constraint Violation: {0}")]
    ConstraintError(String),
}

impl CustomError {
    pub fn error_code(&self) -> &'static str {
        match *self {
            CustomError::InternalServerError(..) => "INTERNAL_SERVER_ERROR",
            CustomError::NotFoundError(..) => "NOT_FOUND_ERROR",
            CustomError::ValidationError(..) => "VALIDATION_ERROR",
            CustomError::ConstraintError(..) => "CONSTRAINT_ERROR",
        }
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::ValidationError(..) => StatusCode::BAD_REQUEST,
            // Uniqueness violations are not handled by any view.
            CustomError::ConstraintError(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_message = json!({
            "success": false,
            "message": self.to_string(),
            "httpStatusCode": self.status_code().as_u16(),
            "error": self.error_code(),
            "service": service_name(),
        });

        HttpResponse::build(self.status_code()).json(error_message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_errors_surface_as_server_failures() {
        let err = CustomError::ConstraintError("duplicate slug".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), "CONSTRAINT_ERROR");
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = CustomError::NotFoundError("Post not found".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Not Found: Post not found");
    }
}
