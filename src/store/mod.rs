/**
 * Credential Store
 *
 * This module defines the credential store contract consumed by the account
 * service, together with the user and address records it manages.
 *
 * # Backends
 *
 * - `postgres` - production backend over a sqlx PostgreSQL pool
 * - `memory`   - in-memory backend for tests and local development
 *
 * # Invariants
 *
 * - Email uniqueness is case-insensitive and enforced atomically by
 *   `create`; callers may pre-check with `find_by_email` but must not rely
 *   on that check for correctness.
 * - Passwords are stored only as bcrypt hashes. Verification goes through
 *   bcrypt's constant-time comparison, never string equality.
 * - Each user owns at most one address; `update_address` replaces the whole
 *   record (last-writer-wins, no version column).
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

/// Postal address owned by a single user
///
/// Exactly one address per user, nullable until first set. The record has
/// no lifecycle of its own; it is written and read only through its user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Address line 1 (required)
    pub line1: String,
    /// Address line 2 (optional)
    pub line2: Option<String>,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Postal code
    pub zip_code: String,
    /// Country
    pub country: String,
}

/// User identity record
///
/// The email doubles as the login handle and the stable identity claim
/// embedded in issued tokens. The password is present only as a bcrypt hash.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,
    /// Unique email (case-insensitive uniqueness)
    pub email: String,
    /// Display name (free text)
    pub display_name: String,
    /// bcrypt password hash
    pub password_hash: String,
    /// Postal address, if set
    pub address: Option<Address>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
///
/// Carries the plaintext password; the store hashes it before persisting
/// and the plaintext never leaves the create call.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name
    pub display_name: String,
    /// Email address
    pub email: String,
    /// Plaintext password, validated and hashed by the store
    pub password: String,
}

/// Credential store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The email is already registered (unique-index violation)
    #[error("email address is already registered")]
    DuplicateEmail,

    /// Store-side validation rejected the record (e.g. password policy)
    #[error("validation failed: {0:?}")]
    Validation(Vec<String>),

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing failure
    #[error("password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Credential store contract
///
/// The account service depends on this trait only; backends are swapped at
/// startup (PostgreSQL in production, in-memory in tests).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by email (case-insensitive), without the address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Look up a user by email with the address eagerly loaded
    async fn find_by_email_with_address(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Create a user, atomically failing on a duplicate email
    ///
    /// # Errors
    ///
    /// - `StoreError::DuplicateEmail` if the email is taken. This is the
    ///   authoritative uniqueness guarantee; any pre-check is a fast path.
    /// - `StoreError::Validation` if the password violates policy.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Replace the user's address (insert or whole-record update)
    async fn update_address(&self, user_id: Uuid, address: Address) -> Result<Address, StoreError>;

    /// Verify a plaintext password against the user's stored hash
    ///
    /// bcrypt internally performs a constant-time comparison; errors from a
    /// corrupt hash are treated as a failed verification rather than
    /// surfaced to the caller.
    fn verify_password(&self, user: &User, password: &str) -> bool {
        bcrypt::verify(password, &user.password_hash).unwrap_or(false)
    }
}

/// Hash a plaintext password with bcrypt
pub fn hash_password(password: &str) -> Result<String, StoreError> {
    Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
}

/// Validate a candidate password against the registration policy
///
/// Returns one message per violated rule; an empty vector means the
/// password is acceptable.
///
/// # Policy
///
/// - At least 8 characters
/// - At least one uppercase letter
/// - At least one lowercase letter
/// - At least one digit
pub fn validate_password(password: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain an uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain a digit".to_string());
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_accepts_conforming() {
        assert!(validate_password("Secret123!").is_empty());
    }

    #[test]
    fn test_validate_password_reports_each_rule() {
        let errors = validate_password("short");
        assert_eq!(errors.len(), 3); // length, uppercase, digit

        let errors = validate_password("nouppercase1");
        assert_eq!(errors, vec!["Password must contain an uppercase letter"]);

        let errors = validate_password("NOLOWERCASE1");
        assert_eq!(errors, vec!["Password must contain a lowercase letter"]);

        let errors = validate_password("NoDigitsHere");
        assert_eq!(errors, vec!["Password must contain a digit"]);
    }

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("Secret123!").unwrap();
        assert_ne!(hash, "Secret123!");
        assert!(bcrypt::verify("Secret123!", &hash).unwrap());
        assert!(!bcrypt::verify("wrong", &hash).unwrap());
    }
}
