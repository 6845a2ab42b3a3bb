//! JSON response envelopes shared by the server and its clients.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationErrors;

/// Successful response carrying a payload: `{message, data}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    #[must_use]
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Response carrying only a message: `{message}`.
///
/// Used for deletions and for every non-validation error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of a 422 response:
/// `{status: "error", message: "Validation failed", errors: {field: [..]}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorBody {
    pub status: String,
    pub message: String,
    pub errors: ValidationErrors,
}

impl ValidationErrorBody {
    pub const STATUS: &'static str = "error";
    pub const MESSAGE: &'static str = "Validation failed";
}

impl From<ValidationErrors> for ValidationErrorBody {
    fn from(errors: ValidationErrors) -> Self {
        Self {
            status: Self::STATUS.to_owned(),
            message: Self::MESSAGE.to_owned(),
            errors,
        }
    }
}
