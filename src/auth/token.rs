/**
 * Bearer Token Issuing and Verification
 *
 * This module handles JWT creation and validation for authenticated
 * requests.
 *
 * # Claims
 *
 * Issued tokens carry the user's email as the subject (the stable identity
 * claim), the display name, the configured issuer, and issued-at/expiry
 * timestamps. Tokens are immutable once issued and are never revoked; a
 * fresh token is minted on every successful login, registration, and
 * current-user request.
 *
 * # Verification
 *
 * Tokens are validated by signature, issuer, and expiry. Audience
 * validation is disabled: tokens carry no `aud` claim and none is required.
 *
 * # Configuration
 *
 * The signing key and issuer come from process-wide configuration loaded
 * once at startup. A missing or too-short key fails `TokenIssuer::new`,
 * which is a fatal startup condition, never a per-request one.
 */

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::server::config::{TokenConfig, MIN_SIGNING_KEY_BYTES};
use crate::store::User;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email, the stable unique identifier
    pub sub: String,
    /// Display name
    pub name: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    /// The signing key is absent or malformed (startup-fatal)
    #[error("signing configuration error: {0}")]
    SigningConfiguration(String),

    /// Token creation failed
    #[error("failed to create token: {0}")]
    Creation(#[source] jsonwebtoken::errors::Error),

    /// The presented token failed validation (signature, issuer, or expiry)
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Token issuer
///
/// Holds the symmetric HS256 key material and issuing parameters. Built
/// once at startup from [`TokenConfig`] and shared across requests; signing
/// is CPU-bound and has no side effects.
#[derive(Clone)]
pub struct TokenIssuer {
    issuer: String,
    lifetime_secs: u64,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Key material stays out of debug output
        f.debug_struct("TokenIssuer")
            .field("issuer", &self.issuer)
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    /// Create an issuer from token configuration
    ///
    /// # Errors
    ///
    /// Returns `TokenError::SigningConfiguration` if the secret is shorter
    /// than [`MIN_SIGNING_KEY_BYTES`]. Callers treat this as fatal.
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        if config.secret.len() < MIN_SIGNING_KEY_BYTES {
            return Err(TokenError::SigningConfiguration(format!(
                "signing key must be at least {MIN_SIGNING_KEY_BYTES} bytes, got {}",
                config.secret.len()
            )));
        }

        Ok(Self {
            issuer: config.issuer.clone(),
            lifetime_secs: config.lifetime_secs,
            encoding_key: EncodingKey::from_secret(config.secret.as_ref()),
            decoding_key: DecodingKey::from_secret(config.secret.as_ref()),
        })
    }

    /// Issue a signed bearer token for a user
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Creation` if encoding fails.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = unix_now();

        let claims = Claims {
            sub: user.email.clone(),
            name: user.display_name.clone(),
            iss: self.issuer.clone(),
            iat: now,
            // Saturate rather than overflow on an absurdly large
            // configured lifetime.
            exp: now.saturating_add(self.lifetime_secs),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Creation)
    }

    /// Verify a bearer token and return its claims
    ///
    /// Checks the signature, the issuer, and the expiry. Audience
    /// validation is disabled.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for any validation failure; callers
    /// map this to 401 without distinguishing the cause.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_aud = false;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(TokenError::Invalid)?;
        Ok(token_data.claims)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
