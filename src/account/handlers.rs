/**
 * Account HTTP Handlers
 *
 * Thin axum handlers over the account service. Authentication is expressed
 * through the `CurrentUser` extractor; handlers only parse the request,
 * call the service, and let `AccountError`'s `IntoResponse` shape failures.
 *
 * # Routes
 *
 * - `GET  /api/account`                    - current user (bearer)
 * - `GET  /api/account/emailexists?email=` - existence probe (public)
 * - `GET  /api/account/address`            - caller's address (bearer)
 * - `PUT  /api/account/address`            - replace the address (bearer)
 * - `POST /api/account/login`              - credential login (public)
 * - `POST /api/account/register`           - registration (public)
 */

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::account::types::{AddressView, LoginRequest, RegisterRequest, UserResponse};
use crate::auth::identity::CurrentUser;
use crate::error::AccountError;
use crate::server::state::AppState;

/// Query parameters for the email existence probe
#[derive(Debug, Deserialize)]
pub struct EmailExistsParams {
    /// Email to probe
    pub email: String,
}

/// `GET /api/account` - the authenticated caller, with a fresh token
///
/// # Errors
///
/// `401` if the token is missing/invalid or its subject no longer resolves.
pub async fn get_current_user(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<UserResponse>, AccountError> {
    let response = state.accounts.current_user(&claims).await?;
    Ok(Json(response))
}

/// `GET /api/account/emailexists` - whether an email is registered
///
/// Public and always succeeds with a boolean body.
pub async fn email_exists(
    State(state): State<AppState>,
    Query(params): Query<EmailExistsParams>,
) -> Result<Json<bool>, AccountError> {
    let exists = state.accounts.email_exists(&params.email).await?;
    Ok(Json(exists))
}

/// `GET /api/account/address` - the caller's address
///
/// Returns the default (empty) view when no address has been set yet.
pub async fn get_address(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<AddressView>, AccountError> {
    let view = state.accounts.address(&claims).await?;
    Ok(Json(view))
}

/// `PUT /api/account/address` - replace the caller's address
///
/// # Errors
///
/// `400` with a generic message if the store rejects the write; `401` for
/// authentication failures. The caller can only ever touch their own record.
pub async fn update_address(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    Json(view): Json<AddressView>,
) -> Result<Json<AddressView>, AccountError> {
    let persisted = state.accounts.update_address(&claims, view).await?;
    Ok(Json(persisted))
}

/// `POST /api/account/login` - authenticate credentials
///
/// # Errors
///
/// `401` with a status-coded payload on bad credentials. An unknown email
/// and a wrong password are indistinguishable by design.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>, AccountError> {
    let response = state.accounts.login(request).await?;
    Ok(Json(response))
}

/// `POST /api/account/register` - create an account
///
/// # Errors
///
/// `400` with `{"errors": [...]}` when the email is taken or the request
/// fails validation.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, AccountError> {
    let response = state.accounts.register(request).await?;
    Ok(Json(response))
}
