//! Client error type.

use thiserror::Error;

use customer_hub_core::ValidationErrors;

/// Errors returned by [`crate::CustomerApi`] and the store actions.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or unreadable response body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    ///
    /// `errors` is set for 422 responses carrying the validation envelope.
    #[error("HTTP {status}: {message}")]
    Status {
        status: u16,
        message: String,
        errors: Option<ValidationErrors>,
    },

    /// The response body did not have the expected shape.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ClientError {
    /// HTTP status of a server-reported failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Field errors of a failed validation, if that is what this is.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Status {
                errors: Some(errors),
                ..
            } => Some(errors),
            _ => None,
        }
    }
}
