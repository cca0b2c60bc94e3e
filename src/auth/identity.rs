/**
 * Identity Resolution
 *
 * This module turns an inbound request's verified token claims into the
 * domain user record.
 *
 * # Two Steps
 *
 * 1. The `CurrentUser` extractor pulls the bearer token from the
 *    `Authorization` header and verifies it, yielding the claims. Missing,
 *    malformed, or invalid tokens reject the request with 401.
 * 2. The `IdentityResolver` looks the subject email up in the credential
 *    store. A blank subject or a subject with no matching user (a stale
 *    token referencing a deleted account) fails with `IdentityNotFound`,
 *    which is treated as unauthorized, not a server error.
 *
 * The email claim is the single source of truth for identity; no other
 * claim participates in resolution.
 */

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use thiserror::Error;

use crate::auth::token::Claims;
use crate::error::AccountError;
use crate::server::state::AppState;
use crate::store::{CredentialStore, StoreError, User};

/// Identity resolution errors
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The identity claim is absent/blank or no matching user exists
    #[error("no user matches the token's identity claim")]
    IdentityNotFound,

    /// The store failed while looking the user up
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves verified claims to user records via the credential store
#[derive(Clone)]
pub struct IdentityResolver {
    store: Arc<dyn CredentialStore>,
}

impl IdentityResolver {
    /// Create a resolver over a credential store
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Resolve the user for a set of verified claims
    ///
    /// # Errors
    ///
    /// `IdentityError::IdentityNotFound` if the subject claim is blank or
    /// no user matches it.
    pub async fn resolve(&self, claims: &Claims) -> Result<User, IdentityError> {
        let email = subject_email(claims)?;
        self.store
            .find_by_email(email)
            .await?
            .ok_or(IdentityError::IdentityNotFound)
    }

    /// Resolve the user with the address eagerly loaded
    pub async fn resolve_with_address(&self, claims: &Claims) -> Result<User, IdentityError> {
        let email = subject_email(claims)?;
        self.store
            .find_by_email_with_address(email)
            .await?
            .ok_or(IdentityError::IdentityNotFound)
    }
}

fn subject_email(claims: &Claims) -> Result<&str, IdentityError> {
    let email = claims.sub.trim();
    if email.is_empty() {
        tracing::warn!("Token subject claim is blank");
        return Err(IdentityError::IdentityNotFound);
    }
    Ok(email)
}

/// Authenticated caller, extracted from the bearer token
///
/// Handlers take `CurrentUser` as a parameter to require authentication.
/// The wrapped claims have already passed signature, issuer, and expiry
/// validation; the user record itself is resolved on demand through the
/// `IdentityResolver`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AccountError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!("Missing Authorization header");
                AccountError::Unauthenticated
            })?;

        // Format: "Bearer <token>"
        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            tracing::warn!("Invalid Authorization header format");
            AccountError::Unauthenticated
        })?;

        let claims = state.tokens.verify(token).map_err(|e| {
            tracing::warn!("Rejected bearer token: {}", e);
            AccountError::Unauthenticated
        })?;

        Ok(CurrentUser(claims))
    }
}
