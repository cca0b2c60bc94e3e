/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration from
 * environment variables.
 *
 * # Configuration Sources
 *
 * Configuration is loaded once at process start and is immutable afterwards.
 * Components receive their configuration explicitly; nothing reads the
 * environment after startup.
 *
 * # Variables
 *
 * - `DATABASE_URL`        - PostgreSQL connection string (required)
 * - `SERVER_PORT`         - HTTP listen port (default: 5000)
 * - `TOKEN_KEY`           - JWT signing secret, at least 32 bytes (required)
 * - `TOKEN_ISSUER`        - `iss` claim for issued tokens (default: "shopauth")
 * - `TOKEN_LIFETIME_SECS` - token validity window (default: 7 days)
 *
 * # Error Handling
 *
 * A missing database URL or a missing/malformed signing key is a fatal
 * startup condition. The server refuses to start rather than degrade.
 */

use thiserror::Error;

/// Minimum accepted signing key length in bytes.
///
/// HS256 keys shorter than the hash output provide less security than the
/// algorithm can deliver, so short keys are rejected at startup.
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

/// Default token lifetime: 7 days.
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration errors raised at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `DATABASE_URL` is not set
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    /// `TOKEN_KEY` is not set
    #[error("TOKEN_KEY is not set; refusing to start without a signing key")]
    MissingSigningKey,

    /// `TOKEN_KEY` is set but too short to sign tokens with
    #[error("TOKEN_KEY must be at least {MIN_SIGNING_KEY_BYTES} bytes, got {0}")]
    SigningKeyTooShort(usize),

    /// `SERVER_PORT` or `TOKEN_LIFETIME_SECS` could not be parsed
    #[error("invalid value for {name}: {value}")]
    InvalidValue {
        /// Environment variable name
        name: &'static str,
        /// The offending value
        value: String,
    },
}

/// Token issuing configuration
///
/// Passed to `TokenIssuer::new`. The secret is the symmetric HS256 signing
/// key; the issuer string is embedded in every token and validated on every
/// authenticated request.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// `iss` claim value
    pub issuer: String,
    /// Symmetric signing secret
    pub secret: String,
    /// Seconds from issuance until expiry
    pub lifetime_secs: u64,
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,
    /// HTTP listen port
    pub port: u16,
    /// Token issuing configuration
    pub token: TokenConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `DATABASE_URL` or `TOKEN_KEY` is missing,
    /// if the signing key is shorter than [`MIN_SIGNING_KEY_BYTES`], or if
    /// a numeric variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let secret = std::env::var("TOKEN_KEY").map_err(|_| ConfigError::MissingSigningKey)?;
        if secret.len() < MIN_SIGNING_KEY_BYTES {
            return Err(ConfigError::SigningKeyTooShort(secret.len()));
        }

        let issuer = std::env::var("TOKEN_ISSUER").unwrap_or_else(|_| "shopauth".to_string());

        let port = match std::env::var("SERVER_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value: raw,
            })?,
            Err(_) => 5000,
        };

        let lifetime_secs = match std::env::var("TOKEN_LIFETIME_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "TOKEN_LIFETIME_SECS",
                value: raw,
            })?,
            Err(_) => DEFAULT_TOKEN_LIFETIME_SECS,
        };

        Ok(Self {
            database_url,
            port,
            token: TokenConfig {
                issuer,
                secret,
                lifetime_secs,
            },
        })
    }
}
