/**
 * Account Handler Types
 *
 * Request and response DTOs for the account endpoints. Field names are
 * camelCase on the wire. These types are wire shapes only; the invariants
 * live in the store and the service.
 */

use serde::{Deserialize, Serialize};

use crate::store::Address;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Email address used as the login handle
    pub email: String,
    /// Plaintext password, verified against the stored hash
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Display name (free text)
    pub display_name: String,
    /// Email address; must not already be registered
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
}

/// User response
///
/// Returned by login, register, and current-user. Always carries a freshly
/// minted token; tokens are never cached or reused across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Email address
    pub email: String,
    /// Display name
    pub display_name: String,
    /// Fresh bearer token
    pub token: String,
}

/// Postal address as it appears on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
    /// Address line 1
    pub line1: String,
    /// Address line 2 (optional)
    pub line2: Option<String>,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Postal code
    pub zip_code: String,
    /// Country
    pub country: String,
}

impl From<Address> for AddressView {
    fn from(address: Address) -> Self {
        Self {
            line1: address.line1,
            line2: address.line2,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
            country: address.country,
        }
    }
}

impl From<AddressView> for Address {
    fn from(view: AddressView) -> Self {
        Self {
            line1: view.line1,
            line2: view.line2,
            city: view.city,
            state: view.state,
            zip_code: view.zip_code,
            country: view.country,
        }
    }
}
