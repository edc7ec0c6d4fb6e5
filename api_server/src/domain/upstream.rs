//! Declared schemas for workflow replies.
//!
//! The workflow tends to wrap single objects in a one-element array, so every
//! reply is first unwrapped with [`decode_single`]; anything else is a typed
//! error instead of a silent fallback.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

use crate::domain::claims::Role;
use crate::domain::entities::{SettingsPatch, StoredUser, UserProfile};

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrList<T> {
    One(T),
    List(Vec<T>),
}

// Decode an object, or a one-element array holding that object.
pub fn decode_single<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    match serde_json::from_value::<OneOrList<T>>(value) {
        Ok(OneOrList::One(item)) => Ok(item),
        Ok(OneOrList::List(mut items)) if items.len() == 1 => Ok(items.remove(0)),
        Ok(OneOrList::List(items)) => Err(format!("expected one item, got {}", items.len())),
        Err(err) => Err(err.to_string()),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(i64),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Text(value) => f.write_str(value),
            RecordId::Number(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Deserialize)]
struct UserRecord {
    #[serde(alias = "userId", alias = "user_id")]
    id: RecordId,
    email: String,
    name: String,
    #[serde(default, alias = "passwordHash")]
    password_hash: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum UserEnvelope {
    Wrapped { user: UserRecord },
    Bare(UserRecord),
}

/// Parse the user workflow reply.
///
/// The role is never taken from upstream: end users are always `Role::User`.
pub fn parse_user(value: Value) -> Result<StoredUser, String> {
    let record = match decode_single::<UserEnvelope>(value)? {
        UserEnvelope::Wrapped { user } => user,
        UserEnvelope::Bare(user) => user,
    };
    Ok(StoredUser {
        profile: UserProfile {
            id: record.id.to_string(),
            email: record.email.trim().to_lowercase(),
            name: record.name,
            role: Role::User,
        },
        password_hash: record.password_hash.filter(|hash| !hash.is_empty()),
    })
}

#[derive(Deserialize)]
struct ChatReplyFields {
    #[serde(alias = "response", alias = "output")]
    reply: String,
}

// Chat reply text, when the workflow produced one.
pub fn parse_chat_reply(value: Value) -> Option<String> {
    let reply = match value {
        Value::String(text) => text,
        other => decode_single::<ChatReplyFields>(other).ok()?.reply,
    };
    let reply = reply.trim();
    (!reply.is_empty()).then(|| reply.to_string())
}

#[derive(Debug, Clone, Deserialize)]
pub struct CouponReply {
    pub valid: bool,
    #[serde(default)]
    pub discount_percent: Option<f64>,
    #[serde(default)]
    pub discount_amount: Option<f64>,
    #[serde(default)]
    pub final_amount: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn parse_coupon(value: Value) -> Result<CouponReply, String> {
    decode_single(value)
}

pub fn parse_settings(value: Value) -> Result<SettingsPatch, String> {
    decode_single(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn when_user_is_wrapped_then_profile_is_extracted() {
        let user = parse_user(json!({
            "success": true,
            "user": {"id": 7, "email": "Asha@Example.com", "name": "Asha", "password_hash": "$argon2id$x"}
        }))
        .expect("expected wrapped user to parse");

        assert_eq!(user.profile.id, "7");
        assert_eq!(user.profile.email, "asha@example.com");
        assert_eq!(user.password_hash.as_deref(), Some("$argon2id$x"));
    }

    #[test]
    fn when_user_is_bare_in_array_then_profile_is_extracted() {
        let user = parse_user(json!([
            {"userId": "row-12", "email": "ravi@example.com", "name": "Ravi", "role": "admin"}
        ]))
        .expect("expected listed user to parse");

        assert_eq!(user.profile.id, "row-12");
        assert_eq!(user.profile.role, Role::User);
        assert!(user.password_hash.is_none());
    }

    #[test]
    fn when_user_shape_is_unknown_then_parse_fails() {
        assert!(parse_user(json!({"ok": true})).is_err());
        assert!(parse_user(json!([])).is_err());
        assert!(parse_user(Value::Null).is_err());
    }

    #[test]
    fn when_chat_reply_uses_output_field_then_text_is_returned() {
        assert_eq!(
            parse_chat_reply(json!([{"output": " Sessions start at 7 PM. "}])),
            Some("Sessions start at 7 PM.".to_string())
        );
        assert_eq!(parse_chat_reply(json!("plain text")), Some("plain text".to_string()));
        assert_eq!(parse_chat_reply(json!({"reply": "  "})), None);
        assert_eq!(parse_chat_reply(json!({"text": "nope"})), None);
    }

    #[test]
    fn when_settings_reply_has_unknown_keys_then_they_are_ignored() {
        let patch = parse_settings(json!([{"price": 699.0, "theme": "dark"}]))
            .expect("expected settings to parse");

        assert_eq!(patch.price, Some(699.0));
        assert!(patch.currency.is_none());
    }

    #[test]
    fn when_coupon_reply_lacks_valid_flag_then_parse_fails() {
        assert!(parse_coupon(json!({"discount_percent": 10})).is_err());
        let reply = parse_coupon(json!({"valid": true, "discount_percent": 20})).unwrap();
        assert!(reply.valid);
        assert_eq!(reply.discount_percent, Some(20.0));
    }
}
