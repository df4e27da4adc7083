use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use jobboard_core::{FieldError, ServiceError, ValidationErrors};

#[derive(Debug, Serialize)]
struct ProblemDetails {
    #[serde(rename = "type")]
    problem_type: &'static str,
    title: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

/// RFC 7807 `application/problem+json` response.
#[derive(Debug)]
pub struct ProblemResponse {
    status: StatusCode,
    body: ProblemDetails,
}

impl ProblemResponse {
    pub fn new<S: Into<String>>(status: StatusCode, problem_type: &'static str, detail: S) -> Self {
        Self {
            status,
            body: ProblemDetails {
                problem_type,
                title: status.canonical_reason().unwrap_or("error"),
                detail: detail.into(),
                errors: Vec::new(),
            },
        }
    }

    /// 422 carrying every field failure; `detail` is the first message.
    pub fn validation(errors: &ValidationErrors) -> Self {
        let mut problem = Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_failed",
            errors.to_string(),
        );
        problem.body.errors = errors.iter().cloned().collect();
        problem
    }
}

impl From<ServiceError> for ProblemResponse {
    fn from(err: ServiceError) -> Self {
        match &err {
            ServiceError::Validation(errors) => Self::validation(errors),
            ServiceError::JobNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "job_not_found", err.to_string())
            }
            ServiceError::CompanyNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "company_not_found", err.to_string())
            }
            ServiceError::Conflict(_) => {
                Self::new(StatusCode::CONFLICT, "concurrency_conflict", err.to_string())
            }
            ServiceError::Repository(source) => {
                error!(stage = "storage", error = %source, "repository failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage_failure",
                    "failed to access job storage",
                )
            }
        }
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let mut response = Json(self.body).into_response();
        *response.status_mut() = self.status;
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}
