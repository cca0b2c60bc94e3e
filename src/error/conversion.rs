/**
 * Error Conversion
 *
 * This module converts account errors into HTTP responses and lifts
 * lower-layer errors into the account taxonomy.
 *
 * # Response Format
 *
 * Coarse failures return `ApiResponse` (`{"status": ..., "message": ...}`);
 * validation and registration failures return `ApiValidationErrorResponse`
 * (`{"errors": [...]}`). All 401s share an identical body so that login
 * failures cannot be used to enumerate accounts.
 */

use axum::response::{IntoResponse, Json, Response};

use crate::auth::identity::IdentityError;
use crate::auth::token::TokenError;
use crate::error::types::{AccountError, ApiResponse, ApiValidationErrorResponse};
use crate::store::StoreError;

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match self {
            Self::EmailAlreadyInUse => {
                let body = ApiValidationErrorResponse {
                    errors: vec!["Email address is in use".to_string()],
                };
                (status, Json(body)).into_response()
            }
            Self::RegistrationFailed(errors) | Self::Validation(errors) => {
                let body = ApiValidationErrorResponse { errors };
                (status, Json(body)).into_response()
            }
            Self::PersistenceFailed => {
                let body = ApiResponse::with_message(status, "Problem updating the user");
                (status, Json(body)).into_response()
            }
            Self::Internal(detail) => {
                // Logged here, never returned to the caller
                tracing::error!("Internal error: {}", detail);
                (status, Json(ApiResponse::new(status))).into_response()
            }
            _ => (status, Json(ApiResponse::new(status))).into_response(),
        }
    }
}

impl From<IdentityError> for AccountError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::IdentityNotFound => Self::IdentityNotFound,
            IdentityError::Store(e) => Self::from(e),
        }
    }
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => Self::EmailAlreadyInUse,
            StoreError::Validation(errors) => Self::RegistrationFailed(errors),
            StoreError::Database(e) => Self::Internal(format!("database error: {e}")),
            StoreError::Hash(e) => Self::Internal(format!("password hashing error: {e}")),
        }
    }
}

impl From<TokenError> for AccountError {
    fn from(err: TokenError) -> Self {
        match err {
            // An invalid presented token is an authentication failure; the
            // other variants only occur on our side of the boundary.
            TokenError::Invalid(_) => Self::Unauthenticated,
            TokenError::SigningConfiguration(e) => Self::Internal(e),
            TokenError::Creation(e) => Self::Internal(format!("token creation failed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    async fn body_json(err: AccountError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_credentials_body() {
        let (status, body) = body_json(AccountError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], 401);
        assert_eq!(body["message"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_enumeration_safety_same_body_for_all_401s() {
        let (_, unknown_email) = body_json(AccountError::InvalidCredentials).await;
        let (_, stale_token) = body_json(AccountError::IdentityNotFound).await;
        let (_, no_token) = body_json(AccountError::Unauthenticated).await;
        assert_eq!(unknown_email, stale_token);
        assert_eq!(unknown_email, no_token);
    }

    #[tokio::test]
    async fn test_email_in_use_body() {
        let (status, body) = body_json(AccountError::EmailAlreadyInUse).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0], "Email address is in use");
    }

    #[tokio::test]
    async fn test_internal_error_is_opaque() {
        let (status, body) =
            body_json(AccountError::Internal("connection refused to db-host:5432".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
        assert!(!body.to_string().contains("db-host"));
    }

    #[tokio::test]
    async fn test_persistence_failed_message() {
        let (status, body) = body_json(AccountError::PersistenceFailed).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Problem updating the user");
    }
}
