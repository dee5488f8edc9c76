//! Mapping of domain errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::todo::ServiceError;

/// Error returned by handlers.
#[derive(Debug)]
pub struct AppError(pub ServiceError);

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.0 {
            ServiceError::InvalidTask(_) => {
                (StatusCode::BAD_REQUEST, "Task description must not be empty").into_response()
            }
            ServiceError::Store(e) => {
                tracing::error!(error = %e, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Task store unavailable, please try again")
                    .into_response()
            }
        }
    }
}
