/**
 * Application State Management
 *
 * This module defines the state shared across request handlers.
 *
 * # Thread Safety
 *
 * Each request handles its own snapshot of data; the only shared mutable
 * resource is the credential store behind the account service, which
 * guarantees per-row atomicity itself. Everything held here is cheaply
 * cloneable and immutable after startup.
 */

use std::sync::Arc;

use crate::account::service::AccountService;
use crate::auth::token::TokenIssuer;
use crate::store::CredentialStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The account service orchestrating all operations
    pub accounts: AccountService,
    /// Token issuer, also used by the `CurrentUser` extractor
    pub tokens: TokenIssuer,
}

impl AppState {
    /// Build state from a credential store and token issuer
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenIssuer) -> Self {
        Self {
            accounts: AccountService::new(store, tokens.clone()),
            tokens,
        }
    }
}
