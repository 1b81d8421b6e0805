//! Error outcomes for the account API
//!
//! Bodies are plain-text messages, matching what existing clients display.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::validation::ValidationError;

/// Failed request outcome.
#[derive(Error, Debug)]
pub enum AccountError {
    /// Malformed, missing or out-of-policy request fields
    #[error("{0}")]
    InvalidInput(String),

    /// Credential or ownership check failed
    #[error("{0}")]
    Unauthorized(String),

    /// The principal has no backing record
    #[error("{0}")]
    NotFound(String),

    /// Email already registered
    #[error("Email already in use.")]
    Conflict,

    /// Unexpected failure; details are logged, never returned
    #[error("Unknown error occurred.")]
    Internal,
}

impl AccountError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AccountError::InvalidInput(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AccountError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AccountError::NotFound(message.into())
    }

    /// HTTP status for this outcome. Conflicts are 400, not 409.
    pub fn status(&self) -> StatusCode {
        match self {
            AccountError::InvalidInput(_) | AccountError::Conflict => StatusCode::BAD_REQUEST,
            AccountError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AccountError::NotFound(_) => StatusCode::NOT_FOUND,
            AccountError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for AccountError {
    fn from(err: ValidationError) -> Self {
        AccountError::InvalidInput(err.to_string())
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Type alias for handler results
pub type AccountResult<T> = Result<T, AccountError>;
