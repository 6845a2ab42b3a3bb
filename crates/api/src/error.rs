//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Server errors are captured to
//! Sentry before responding; their details never reach the client.

use axum::{
    Json,
    extract::rejection::{BytesRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use customer_hub_core::{MessageResponse, SortError, ValidationErrorBody, ValidationErrors};

use crate::db::RepositoryError;
use crate::services::CustomerError;

/// Realm advertised in `WWW-Authenticate` challenges.
pub const AUTH_REALM: &str = "customers";

/// Application-level error type for the customer API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or wrong basic auth credentials.
    #[error("Unauthenticated.")]
    Unauthorized,

    /// Submitted fields failed validation.
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Request body over the configured limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Repository(RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CustomerError> for AppError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::Validation(errors) => Self::Validation(errors),
            CustomerError::NotFound(id) => Self::NotFound(not_found_message(id)),
            CustomerError::Repository(e) => Self::Repository(e),
            CustomerError::Password(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<SortError> for AppError {
    fn from(err: SortError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<BytesRejection> for AppError {
    fn from(err: BytesRejection) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge(err.body_text())
        } else {
            Self::BadRequest(err.body_text())
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        Self::BadRequest(err.body_text())
    }
}

/// Message for a customer ID that does not resolve.
#[must_use]
pub fn not_found_message(id: impl std::fmt::Display) -> String {
    format!("No query results for customer {id}")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Repository(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        match self {
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ValidationErrorBody::from(errors)),
            )
                .into_response(),
            Self::Unauthorized => {
                let mut response = (
                    StatusCode::UNAUTHORIZED,
                    Json(MessageResponse::new(Self::Unauthorized.to_string())),
                )
                    .into_response();
                let challenge = format!("Basic realm=\"{AUTH_REALM}\"");
                if let Ok(value) = HeaderValue::from_str(&challenge) {
                    response
                        .headers_mut()
                        .insert(header::WWW_AUTHENTICATE, value);
                }
                response
            }
            Self::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(MessageResponse::new(msg))).into_response()
            }
            Self::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(MessageResponse::new(msg))).into_response()
            }
            Self::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(MessageResponse::new(msg)),
            )
                .into_response(),
            // Don't expose internal error details to clients
            Self::Repository(_) | Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(MessageResponse::new("Server Error")),
            )
                .into_response(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::PayloadTooLarge("test".to_string())),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            get_status(AppError::Validation(ValidationErrors::single("x", "bad"))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_validation_envelope() {
        let errors = ValidationErrors::single("username", "The username field is required.");
        let body = body_json(AppError::Validation(errors).into_response()).await;

        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"]["username"][0], "The username field is required.");
    }

    #[tokio::test]
    async fn test_unauthorized_has_challenge() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=\"customers\""
        );
        let body = body_json(response).await;
        assert_eq!(body["message"], "Unauthenticated.");
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let response = AppError::Internal("pool exhausted at 10.0.0.5".to_string()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["message"], "Server Error");
    }

    #[test]
    fn test_customer_error_mapping() {
        let err: AppError = CustomerError::NotFound(customer_hub_core::CustomerId::new(7)).into();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg.ends_with(" 7")));
    }
}
