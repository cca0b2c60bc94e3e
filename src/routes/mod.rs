/**
 * Router Configuration
 *
 * This module builds the Axum router for the account API.
 *
 * # Routes
 *
 * All routes live under the `/api/account` prefix:
 *
 * - `GET  /api/account`                    - current user (bearer token)
 * - `GET  /api/account/emailexists`        - email existence probe
 * - `GET  /api/account/address`            - caller's address (bearer token)
 * - `PUT  /api/account/address`            - replace the address (bearer token)
 * - `POST /api/account/login`              - credential login
 * - `POST /api/account/register`           - registration
 *
 * # Boundary Handling
 *
 * Unknown routes return a 404 `ApiResponse`. Panics anywhere in the
 * pipeline are caught by `CatchPanicLayer` and converted to an opaque 500
 * `ApiResponse`; no stack traces or internal identifiers reach the client.
 * Every request is traced via `TraceLayer`.
 */

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::account::handlers::{
    email_exists, get_address, get_current_user, login, register, update_address,
};
use crate::error::ApiResponse;
use crate::server::state::AppState;

/// Create the router with all account routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/account", get(get_current_user))
        .route("/api/account/emailexists", get(email_exists))
        .route(
            "/api/account/address",
            get(get_address).put(update_address),
        )
        .route("/api/account/login", post(login))
        .route("/api/account/register", post(register))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

async fn not_found() -> Response {
    let status = StatusCode::NOT_FOUND;
    (status, Json(ApiResponse::new(status))).into_response()
}

/// Convert an escaped panic into an opaque 500 response
fn handle_panic(err: Box<dyn std::any::Any + Send + 'static>) -> Response<Body> {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", detail);

    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (status, Json(ApiResponse::new(status))).into_response()
}
