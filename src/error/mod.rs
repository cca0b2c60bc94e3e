//! Error Module
//!
//! Account error taxonomy and HTTP response conversion.
//!
//! - **`types`**      - `AccountError` and the wire payloads
//! - **`conversion`** - `IntoResponse` and `From` implementations

/// Error to HTTP response conversion
pub mod conversion;

/// Error types and wire payloads
pub mod types;

pub use types::{AccountError, ApiResponse, ApiValidationErrorResponse};
