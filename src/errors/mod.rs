//! Unified error handling with consistent API response envelope.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Error detail in the API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Consistent JSON envelope for all API responses.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wrap a successful result in the envelope.
    pub fn success(data: T) -> Json<Self> {
        Json(Self {
            data: Some(data),
            error: None,
        })
    }

    /// Wrap an error in the envelope.
    pub fn error(code: &str, message: &str) -> Json<Self> {
        Json(Self {
            data: None,
            error: Some(ApiError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        })
    }
}

/// Which of the two analyst ratings failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingField {
    Likelihood,
    Impact,
}

impl fmt::Display for RatingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Likelihood => write!(f, "Likelihood"),
            Self::Impact => write!(f, "Impact"),
        }
    }
}

/// Validation failures raised while scoring and constructing an assessment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssessmentError {
    #[error("{field} must be an integer between 1 and 5")]
    InvalidRating { field: RatingField },

    #[error("Score must be an integer between 1 and 25")]
    InvalidScore(i64),

    #[error("{0} is required")]
    MissingField(&'static str),
}

/// Application error type mapping to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<AssessmentError> for AppError {
    fn from(err: AssessmentError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, ApiResponse::<()>::error(code, &message)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_response_success() {
        let response = ApiResponse::success("hello");
        let json = serde_json::to_value(&response.0).unwrap();
        assert_eq!(json["data"], "hello");
        assert!(json["error"].is_null());
    }

    #[test]
    fn api_response_error() {
        let response = ApiResponse::<()>::error("NOT_FOUND", "Risk not found");
        let json = serde_json::to_value(&response.0).unwrap();
        assert!(json["data"].is_null());
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Risk not found");
    }

    #[test]
    fn app_error_status_codes() {
        let status = |err: AppError| err.into_response().status();
        assert_eq!(status(AppError::NotFound("risk 7".to_string())), StatusCode::NOT_FOUND);
        assert_eq!(status(AppError::Validation("x".to_string())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn assessment_error_messages() {
        let err = AssessmentError::InvalidRating {
            field: RatingField::Likelihood,
        };
        assert_eq!(err.to_string(), "Likelihood must be an integer between 1 and 5");

        let err = AssessmentError::InvalidRating {
            field: RatingField::Impact,
        };
        assert_eq!(err.to_string(), "Impact must be an integer between 1 and 5");

        assert_eq!(
            AssessmentError::InvalidScore(26).to_string(),
            "Score must be an integer between 1 and 25"
        );
        assert_eq!(
            AssessmentError::MissingField("asset").to_string(),
            "asset is required"
        );
    }

    #[test]
    fn assessment_error_becomes_validation() {
        let err: AppError = AssessmentError::MissingField("threat").into();
        assert_eq!(err.to_string(), "Validation error: threat is required");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn app_error_from_sqlx() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Database(_)));
    }
}
