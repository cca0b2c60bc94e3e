//! Account Module
//!
//! The account service and its HTTP surface.
//!
//! - **`types`**    - request/response DTOs
//! - **`service`**  - `AccountService`: the six account operations
//! - **`handlers`** - thin axum handlers over the service

/// HTTP handlers
pub mod handlers;

/// Account operations
pub mod service;

/// Request and response types
pub mod types;

pub use service::AccountService;
pub use types::{AddressView, LoginRequest, RegisterRequest, UserResponse};
