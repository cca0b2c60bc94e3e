/**
 * ShopAuth - Account Authentication Service
 *
 * This crate implements the account surface of the storefront backend:
 * user registration, credential login, bearer-token issuance, current-user
 * resolution, and the per-user postal address record.
 *
 * # Module Structure
 *
 * - `server`   - Configuration loading, application state, server wiring
 * - `routes`   - Axum router configuration
 * - `store`    - Credential store contract plus PostgreSQL and in-memory backends
 * - `auth`     - JWT token issuing/verification and identity resolution
 * - `account`  - Account service operations, DTOs, and HTTP handlers
 * - `error`    - Error taxonomy and HTTP response conversion
 */

pub mod account;
pub mod auth;
pub mod error;
pub mod routes;
pub mod server;
pub mod store;
