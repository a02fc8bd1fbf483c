//! Application error handling
//!
//! Client errors (400, 404, 409) are answered with a plain-text body: the
//! message itself, or one `"field" - message` line per invalid field.
//! Server errors are logged and answered with a generic JSON envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use calorie_tracker_shared::validation::NULL_MESSAGE;
use calorie_tracker_shared::{CalorieError, DateRangeError, FieldErrors};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidFields(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    pub fn user_not_found() -> Self {
        Self::NotFound("User not found".to_string())
    }

    pub fn meal_not_found() -> Self {
        Self::NotFound("Meal not found".to_string())
    }

    pub fn dish_not_found() -> Self {
        Self::NotFound("Dish not found".to_string())
    }

    /// A required payload field that was missing or null
    pub fn missing_field(field: &str) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field, NULL_MESSAGE);
        Self::InvalidFields(fields)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidFields(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CalorieError> for ApiError {
    fn from(err: CalorieError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<DateRangeError> for ApiError {
    fn from(err: DateRangeError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::InvalidFields(FieldErrors::from(&errors))
    }
}

/// Error response body for server failures
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (code, message) = match &self {
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                ("INTERNAL_ERROR", "An internal error occurred")
            }
            ApiError::Database(err) => {
                error!("Database error: {:?}", err);
                ("DATABASE_ERROR", "A database error occurred")
            }
            _ => return (status, self.to_string()).into_response(),
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_body_is_message() {
        let response = ApiError::user_not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "User not found");
    }

    #[tokio::test]
    async fn test_invalid_fields_body_lists_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("name", "must not be blank");
        fields.insert("age", "must be between 1 and 100");

        let response = ApiError::InvalidFields(fields).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "\"age\" - must be between 1 and 100\n\"name\" - must not be blank"
        );
    }

    #[test]
    fn test_conflict_status() {
        let response = ApiError::Conflict("Email already in use".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_calorie_error_is_validation() {
        let err: ApiError = CalorieError::IncompleteParameters(vec!["weight"]).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("weight"));
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::Internal(anyhow::anyhow!("connection reset")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("connection reset"));
    }
}
