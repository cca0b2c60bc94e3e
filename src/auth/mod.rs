//! Authentication Module
//!
//! JWT token issuance/verification and claims-to-identity resolution.
//!
//! - **`token`**    - `TokenIssuer`: signs and verifies bearer tokens
//! - **`identity`** - `IdentityResolver` and the `CurrentUser` extractor

/// Identity resolution from verified claims
pub mod identity;

/// JWT token issuing and verification
pub mod token;

pub use identity::{CurrentUser, IdentityError, IdentityResolver};
pub use token::{Claims, TokenError, TokenIssuer};
