/**
 * Account Service
 *
 * This module implements the six account operations, composing the
 * credential store, the token issuer, and the identity resolver.
 *
 * # Operations
 *
 * - `current_user`   - resolve the caller and mint a fresh token
 * - `email_exists`   - unauthenticated existence probe
 * - `address`        - the caller's address (default view when unset)
 * - `update_address` - replace the caller's address
 * - `login`          - verify credentials, mint a token
 * - `register`       - create a user, mint a token
 *
 * # Security
 *
 * - Login never reveals whether the email exists: an unknown email and a
 *   wrong password produce the same `InvalidCredentials` failure.
 * - Registration pre-checks the email for a friendly fast-path message, but
 *   the store's atomic create is the authoritative uniqueness guarantee;
 *   a concurrent registration that slips past the pre-check surfaces as
 *   the same `EmailAlreadyInUse` failure.
 * - Every successful user-returning operation mints a fresh token.
 */

use std::sync::Arc;

use crate::account::types::{AddressView, LoginRequest, RegisterRequest, UserResponse};
use crate::auth::identity::IdentityResolver;
use crate::auth::token::{Claims, TokenIssuer};
use crate::error::AccountError;
use crate::store::{CredentialStore, NewUser, User};

/// Orchestrates the account operations
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    identity: IdentityResolver,
    tokens: TokenIssuer,
}

impl AccountService {
    /// Create a service over a credential store and token issuer
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenIssuer) -> Self {
        let identity = IdentityResolver::new(Arc::clone(&store));
        Self {
            store,
            identity,
            tokens,
        }
    }

    /// Resolve the authenticated caller and return a fresh token
    ///
    /// # Errors
    ///
    /// `AccountError::IdentityNotFound` when the token's subject no longer
    /// resolves to a user.
    pub async fn current_user(&self, claims: &Claims) -> Result<UserResponse, AccountError> {
        let user = self.identity.resolve(claims).await?;
        self.user_response(&user)
    }

    /// Check whether an email is registered
    pub async fn email_exists(&self, email: &str) -> Result<bool, AccountError> {
        Ok(self.store.find_by_email(email).await?.is_some())
    }

    /// The caller's address, or the default (empty) view when unset
    pub async fn address(&self, claims: &Claims) -> Result<AddressView, AccountError> {
        let user = self.identity.resolve_with_address(claims).await?;
        Ok(user.address.map(AddressView::from).unwrap_or_default())
    }

    /// Replace the caller's address and return the persisted view
    ///
    /// The whole record is applied or none of it; concurrent updates are
    /// last-writer-wins.
    ///
    /// # Errors
    ///
    /// `AccountError::PersistenceFailed` when the store rejects the write.
    pub async fn update_address(
        &self,
        claims: &Claims,
        view: AddressView,
    ) -> Result<AddressView, AccountError> {
        let user = self.identity.resolve_with_address(claims).await?;

        let persisted = self
            .store
            .update_address(user.id, view.into())
            .await
            .map_err(|e| {
                tracing::error!("Failed to update address for {}: {}", user.email, e);
                AccountError::PersistenceFailed
            })?;

        tracing::info!("Updated address for {}", user.email);
        Ok(persisted.into())
    }

    /// Authenticate credentials and return a fresh token
    ///
    /// # Errors
    ///
    /// `AccountError::Validation` for blank fields;
    /// `AccountError::InvalidCredentials` for an unknown email or a wrong
    /// password, without distinguishing the two.
    pub async fn login(&self, request: LoginRequest) -> Result<UserResponse, AccountError> {
        let errors = validate_login(&request);
        if !errors.is_empty() {
            return Err(AccountError::Validation(errors));
        }

        let user = self
            .store
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                tracing::warn!("Login failed for {}", request.email);
                AccountError::InvalidCredentials
            })?;

        if !self.store.verify_password(&user, &request.password) {
            tracing::warn!("Login failed for {}", request.email);
            return Err(AccountError::InvalidCredentials);
        }

        tracing::info!("User logged in: {}", user.email);
        self.user_response(&user)
    }

    /// Register a new user and return a fresh token
    ///
    /// # Errors
    ///
    /// `AccountError::Validation` for malformed requests;
    /// `AccountError::EmailAlreadyInUse` when the email is taken;
    /// `AccountError::RegistrationFailed` when the store rejects the record
    /// (e.g. password policy).
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse, AccountError> {
        let errors = validate_register(&request);
        if !errors.is_empty() {
            return Err(AccountError::Validation(errors));
        }

        // Fast-path pre-check for a friendly message. Not the security
        // boundary: two concurrent registrations can both pass this check,
        // and the store's unique index decides the winner below.
        if self.email_exists(&request.email).await? {
            tracing::warn!("Registration rejected, email in use: {}", request.email);
            return Err(AccountError::EmailAlreadyInUse);
        }

        let user = self
            .store
            .create(NewUser {
                display_name: request.display_name,
                email: request.email,
                password: request.password,
            })
            .await?;

        tracing::info!("User registered: {}", user.email);
        self.user_response(&user)
    }

    fn user_response(&self, user: &User) -> Result<UserResponse, AccountError> {
        let token = self.tokens.issue(user)?;
        Ok(UserResponse {
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            token,
        })
    }
}

fn validate_login(request: &LoginRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if request.email.trim().is_empty() {
        errors.push("Email is required".to_string());
    }
    if request.password.is_empty() {
        errors.push("Password is required".to_string());
    }
    errors
}

fn validate_register(request: &RegisterRequest) -> Vec<String> {
    let mut errors = Vec::new();
    if request.display_name.trim().is_empty() {
        errors.push("Display name is required".to_string());
    }
    if request.email.trim().is_empty() {
        errors.push("Email is required".to_string());
    } else if !request.email.contains('@') {
        errors.push("Email is not a valid email address".to_string());
    }
    if request.password.is_empty() {
        errors.push("Password is required".to_string());
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::config::TokenConfig;
    use crate::store::{Address, MemoryCredentialStore, StoreError};
    use async_trait::async_trait;
    use uuid::Uuid;

    fn test_tokens() -> TokenIssuer {
        TokenIssuer::new(&TokenConfig {
            issuer: "shopauth-test".to_string(),
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            lifetime_secs: 3600,
        })
        .unwrap()
    }

    fn service() -> AccountService {
        AccountService::new(Arc::new(MemoryCredentialStore::new()), test_tokens())
    }

    /// Store whose reads work but whose address writes always fail,
    /// standing in for a database outage mid-request.
    struct WriteFailingStore {
        inner: MemoryCredentialStore,
    }

    #[async_trait]
    impl CredentialStore for WriteFailingStore {
        async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
            self.inner.find_by_email(email).await
        }

        async fn find_by_email_with_address(
            &self,
            email: &str,
        ) -> Result<Option<User>, StoreError> {
            self.inner.find_by_email_with_address(email).await
        }

        async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
            self.inner.create(new_user).await
        }

        async fn update_address(
            &self,
            _user_id: Uuid,
            _address: Address,
        ) -> Result<Address, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolClosed))
        }
    }

    fn alice() -> RegisterRequest {
        RegisterRequest {
            display_name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Secret123!".to_string(),
        }
    }

    fn claims(email: &str) -> Claims {
        Claims {
            sub: email.to_string(),
            name: String::new(),
            iss: "shopauth-test".to_string(),
            iat: 0,
            exp: u64::MAX,
        }
    }

    fn springfield() -> AddressView {
        AddressView {
            line1: "1 Main St".to_string(),
            line2: None,
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            country: "US".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login_then_email_exists() {
        let service = service();

        let registered = service.register(alice()).await.unwrap();
        assert_eq!(registered.email, "alice@example.com");
        assert_eq!(registered.display_name, "Alice");
        assert!(!registered.token.is_empty());

        let logged_in = service
            .login(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "Secret123!".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.email, "alice@example.com");

        assert!(service.email_exists("alice@example.com").await.unwrap());
        assert!(!service.email_exists("bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_register_leaves_record_intact() {
        let service = service();
        service.register(alice()).await.unwrap();

        let mut second = alice();
        second.display_name = "Impostor".to_string();
        second.password = "Other123!".to_string();
        let result = service.register(second).await;
        assert!(matches!(result, Err(AccountError::EmailAlreadyInUse)));

        // The original credentials still work; the impostor's do not.
        assert!(service
            .login(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "Secret123!".to_string(),
            })
            .await
            .is_ok());
        assert!(matches!(
            service
                .login(LoginRequest {
                    email: "alice@example.com".to_string(),
                    password: "Other123!".to_string(),
                })
                .await,
            Err(AccountError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let service = service();
        service.register(alice()).await.unwrap();

        let wrong_password = service
            .login(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;
        let unknown_email = service
            .login(LoginRequest {
                email: "ghost@example.com".to_string(),
                password: "Secret123!".to_string(),
            })
            .await;

        assert!(matches!(wrong_password, Err(AccountError::InvalidCredentials)));
        assert!(matches!(unknown_email, Err(AccountError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_register_weak_password_fails_policy() {
        let service = service();
        let mut weak = alice();
        weak.password = "alllowercase".to_string();

        let result = service.register(weak).await;
        match result {
            Err(AccountError::RegistrationFailed(errors)) => {
                assert!(errors.iter().any(|e| e.contains("uppercase")));
            }
            other => panic!("expected RegistrationFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_validation_errors() {
        let service = service();

        let result = service
            .register(RegisterRequest {
                display_name: String::new(),
                email: "not-an-email".to_string(),
                password: String::new(),
            })
            .await;
        match result {
            Err(AccountError::Validation(errors)) => {
                assert_eq!(errors.len(), 3);
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_current_user_mints_fresh_token() {
        let service = service();
        service.register(alice()).await.unwrap();

        let response = service.current_user(&claims("alice@example.com")).await.unwrap();
        assert_eq!(response.email, "alice@example.com");
        assert_eq!(response.display_name, "Alice");
        assert!(!response.token.is_empty());
    }

    #[tokio::test]
    async fn test_current_user_stale_subject() {
        let service = service();
        let result = service.current_user(&claims("deleted@example.com")).await;
        assert!(matches!(result, Err(AccountError::IdentityNotFound)));
    }

    #[tokio::test]
    async fn test_address_round_trip() {
        let service = service();
        service.register(alice()).await.unwrap();
        let caller = claims("alice@example.com");

        // Unset address reads back as the default view
        let initial = service.address(&caller).await.unwrap();
        assert_eq!(initial, AddressView::default());

        let persisted = service
            .update_address(&caller, springfield())
            .await
            .unwrap();
        assert_eq!(persisted, springfield());

        let loaded = service.address(&caller).await.unwrap();
        assert_eq!(loaded, springfield());
    }

    #[tokio::test]
    async fn test_update_address_store_failure_is_persistence_failed() {
        let store = WriteFailingStore {
            inner: MemoryCredentialStore::new(),
        };
        store
            .inner
            .create(NewUser {
                display_name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "Secret123!".to_string(),
            })
            .await
            .unwrap();
        let service = AccountService::new(Arc::new(store), test_tokens());

        let result = service
            .update_address(&claims("alice@example.com"), springfield())
            .await;
        assert!(matches!(result, Err(AccountError::PersistenceFailed)));
    }

    #[tokio::test]
    async fn test_address_requires_resolvable_identity() {
        let service = service();
        let result = service
            .update_address(&claims("ghost@example.com"), springfield())
            .await;
        assert!(matches!(result, Err(AccountError::IdentityNotFound)));
    }
}
