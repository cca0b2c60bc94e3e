/**
 * Server Initialization
 *
 * This module assembles the application: database pool, migrations, token
 * issuer, account service, and router.
 *
 * # Failure Semantics
 *
 * Everything here is startup-fatal. In particular a missing or malformed
 * signing key surfaces as `InitError::Token` before the server binds a
 * socket; it is never a per-request condition.
 */

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::token::{TokenError, TokenIssuer};
use crate::routes::create_router;
use crate::server::config::AppConfig;
use crate::server::state::AppState;
use crate::store::PgCredentialStore;

/// Startup errors
#[derive(Debug, Error)]
pub enum InitError {
    /// Could not connect to the database
    #[error("failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),

    /// Migrations failed to apply
    #[error("failed to run migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Token issuer construction failed (signing configuration)
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Create the application router from configuration
///
/// Connects the PostgreSQL pool, applies migrations, builds the token
/// issuer and account service, and wires the routes.
///
/// # Errors
///
/// Any `InitError`; callers should treat all of them as fatal.
pub async fn create_app(config: AppConfig) -> Result<Router, InitError> {
    tracing::info!("Connecting to database");
    let pool = PgPool::connect(&config.database_url).await?;

    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;

    let tokens = TokenIssuer::new(&config.token)?;
    let store = Arc::new(PgCredentialStore::new(pool));
    let state = AppState::new(store, tokens);

    Ok(create_router(state))
}
