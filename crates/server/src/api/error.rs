use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gradebook_api_types::ErrorResponse;
use tracing::error;

use crate::service::ServiceError;

#[derive(Debug)]
pub struct ApiError {
    message: String,
    code: &'static str,
    status: StatusCode,
}

impl ApiError {
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: "INVALID_FILTER",
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn unknown_schema(raw: &str) -> Self {
        Self {
            message: format!("grading schema not found: {raw}"),
            code: "SCHEMA_NOT_FOUND",
            status: StatusCode::NOT_FOUND,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let message = err.to_string();
        let (code, status) = match err {
            ServiceError::NoMarksFound { .. } => ("NO_MARKS_FOUND", StatusCode::NOT_FOUND),
            ServiceError::ResultFrozen { .. } => ("RESULT_FROZEN", StatusCode::CONFLICT),
            ServiceError::GradingSchemaNotFound(_) => ("SCHEMA_NOT_FOUND", StatusCode::NOT_FOUND),
            ServiceError::InvalidGradingSchema(_) => {
                ("INVALID_GRADING_SCHEMA", StatusCode::BAD_REQUEST)
            }
            ServiceError::Storage(err) => {
                error!(error = ?err, "request failed on storage");
                ("INTERNAL_ERROR", StatusCode::INTERNAL_SERVER_ERROR)
            }
        };
        Self {
            message,
            code,
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            code: self.code.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}
