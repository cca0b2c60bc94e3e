//! Common test utilities
//!
//! Builds a `TestServer` over the real router, backed by the in-memory
//! credential store so the suite runs without a database. The token issuer
//! uses a fixed secret so tests can mint tokens out-of-band.

use std::sync::Arc;

use axum_test::TestServer;
use shopauth::auth::token::TokenIssuer;
use shopauth::routes::create_router;
use shopauth::server::config::TokenConfig;
use shopauth::server::state::AppState;
use shopauth::store::MemoryCredentialStore;

/// Signing secret shared by the test server and out-of-band token minting
pub const TEST_SECRET: &str = "test-secret-test-secret-test-secret!";

/// Issuer string used by the test server
pub const TEST_ISSUER: &str = "shopauth-test";

/// Token issuer matching the test server's configuration
pub fn test_token_issuer() -> TokenIssuer {
    TokenIssuer::new(&TokenConfig {
        issuer: TEST_ISSUER.to_string(),
        secret: TEST_SECRET.to_string(),
        lifetime_secs: 3600,
    })
    .expect("test token config is valid")
}

/// Start a test server over the real router with an empty in-memory store
pub fn test_server() -> TestServer {
    let state = AppState::new(Arc::new(MemoryCredentialStore::new()), test_token_issuer());
    TestServer::new(create_router(state)).expect("test server should start")
}

/// Register a user and return the token from the response
pub async fn register_user(
    server: &TestServer,
    display_name: &str,
    email: &str,
    password: &str,
) -> String {
    let response = server
        .post("/api/account/register")
        .json(&serde_json::json!({
            "displayName": display_name,
            "email": email,
            "password": password,
        }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    body["token"]
        .as_str()
        .expect("register response carries a token")
        .to_string()
}

/// Bearer header value for a token
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
