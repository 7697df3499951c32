use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::error;

use super::domain::FieldErrors;
use super::service::ApplicationServiceError;

/// JSON error envelope returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub timestamp: NaiveDateTime,
    #[serde(rename = "status")]
    pub http_status_code: u16,
    #[serde(rename = "error")]
    pub reason_phrase: String,
    pub message: String,
    #[serde(rename = "path")]
    pub request_path: String,
}

impl ApiErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            http_status_code: status.as_u16(),
            reason_phrase: status.canonical_reason().unwrap_or_default().to_string(),
            message: message.into(),
            request_path: path.into(),
        }
    }
}

/// A typed failure bound to the request path it occurred on.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    path: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn from_service(err: ApplicationServiceError, path: &str) -> Self {
        let status = match &err {
            ApplicationServiceError::InvalidPersonalId(_)
            | ApplicationServiceError::PersonalIdMismatch => StatusCode::BAD_REQUEST,
            ApplicationServiceError::NotFound => StatusCode::NOT_FOUND,
            ApplicationServiceError::DuplicateEntry => StatusCode::CONFLICT,
            ApplicationServiceError::Repository(source) => {
                error!(error = %source, path, "credit card application store failed");
                return Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected storage error occurred.",
                    path,
                );
            }
        };

        Self::new(status, err.to_string(), path)
    }

    pub fn validation(errors: FieldErrors, path: &str) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, errors.to_string(), path)
    }

    /// Bodies that are not valid JSON or do not fit the payload shape are bad
    /// requests. A missing content type or unreadable body keeps the
    /// extractor's own status.
    pub fn rejection(rejection: JsonRejection, path: &str) -> Self {
        let status = match &rejection {
            JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
                StatusCode::BAD_REQUEST
            }
            other => other.status(),
        };
        Self::new(status, rejection.body_text(), path)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse::new(self.status, self.message, self.path);
        (self.status, Json(body)).into_response()
    }
}
