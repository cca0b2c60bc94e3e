/**
 * Account Error Types
 *
 * This module defines the error taxonomy crossing the account service
 * boundary, plus the JSON payload shapes the API returns for failures.
 *
 * # Taxonomy
 *
 * - `InvalidCredentials`  - login failed; absent user and wrong password are
 *                           deliberately indistinguishable (401)
 * - `EmailAlreadyInUse`   - registration with a taken email (400, carries the
 *                           explicit "Email address is in use" message)
 * - `RegistrationFailed`  - store-side validation rejected the registration,
 *                           e.g. password policy (400)
 * - `Validation`          - request-shape validation failed (400)
 * - `Unauthenticated`     - missing/invalid bearer token (401)
 * - `IdentityNotFound`    - a verified token's subject no longer resolves to
 *                           a user; treated as unauthorized, not a crash (401)
 * - `PersistenceFailed`   - the address update could not be persisted (400)
 * - `Internal`            - anything infrastructural; detail is logged, a
 *                           generic message crosses the boundary (500)
 *
 * # Propagation Policy
 *
 * Store and infrastructure failures never surface internal detail to the
 * caller. Only the coarse category and a safe message leave the process.
 */

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors crossing the account service boundary
#[derive(Debug, Error)]
pub enum AccountError {
    /// Login failed; does not disambiguate unknown email from wrong password
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Registration attempted with an email that is already registered
    #[error("email address is in use")]
    EmailAlreadyInUse,

    /// Store-side validation rejected the registration
    #[error("registration failed")]
    RegistrationFailed(Vec<String>),

    /// Request-shape validation failed
    #[error("validation failed")]
    Validation(Vec<String>),

    /// The request carried no valid bearer token
    #[error("unauthenticated")]
    Unauthenticated,

    /// The token's subject no longer resolves to a user
    #[error("identity not found")]
    IdentityNotFound,

    /// The address update could not be persisted
    #[error("persistence failed")]
    PersistenceFailed,

    /// Infrastructure failure; the message is logged, never returned
    #[error("internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials | Self::Unauthenticated | Self::IdentityNotFound => {
                StatusCode::UNAUTHORIZED
            }
            Self::EmailAlreadyInUse
            | Self::RegistrationFailed(_)
            | Self::Validation(_)
            | Self::PersistenceFailed => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Status-coded error payload
///
/// The body returned for coarse failures: `{"status": 401, "message": "..."}`.
/// The message defaults per status so that, for instance, every 401 carries
/// the same body regardless of cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Safe, caller-facing message
    pub message: String,
}

impl ApiResponse {
    /// Create a payload with the default message for a status code
    pub fn new(status: StatusCode) -> Self {
        Self::with_message(status, default_message(status))
    }

    /// Create a payload with an explicit message
    pub fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Validation error payload: `{"errors": ["...", ...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiValidationErrorResponse {
    /// One message per violated rule
    pub errors: Vec<String>,
}

fn default_message(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Bad request",
        StatusCode::UNAUTHORIZED => "Unauthorized",
        StatusCode::NOT_FOUND => "Resource not found",
        StatusCode::INTERNAL_SERVER_ERROR => "Internal server error",
        _ => "Request failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AccountError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AccountError::IdentityNotFound.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AccountError::EmailAlreadyInUse.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AccountError::PersistenceFailed.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AccountError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_default_messages() {
        let body = ApiResponse::new(StatusCode::UNAUTHORIZED);
        assert_eq!(body.status, 401);
        assert_eq!(body.message, "Unauthorized");
    }
}
