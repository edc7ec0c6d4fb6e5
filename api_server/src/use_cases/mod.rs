// Use cases layer: one workflow per public operation, generic over domain ports.

pub mod admin;
pub mod ai_chat;
pub mod analytics;
pub mod capture_lead;
pub mod contact;
pub mod settings;
pub mod simulate_payment;
pub mod user_auth;
pub mod validate_coupon;
pub mod verify_token;
pub mod webinar_info;

#[cfg(test)]
pub(crate) mod test_support;

use serde::Serialize;
use serde_json::Value;

// Serialize an outgoing workflow payload. Plain data structs never fail here.
pub(crate) fn to_payload<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}
