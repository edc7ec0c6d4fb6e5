use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::UserProfile;

// Token lifetimes in seconds.
pub const ADMIN_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;
pub const USER_TOKEN_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
pub const REMEMBER_ME_TOKEN_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// JWT payload shared by admin and end-user sessions.
///
/// Admin tokens carry `username`; user tokens carry `email` and `userId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub remember_me: bool,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn admin(username: &str, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            email: None,
            username: Some(username.to_string()),
            name: "Administrator".to_string(),
            role: Role::Admin,
            user_id: None,
            remember_me: false,
            iat,
            exp: iat + ADMIN_TOKEN_TTL_SECONDS,
        }
    }

    pub fn user(profile: &UserProfile, remember_me: bool, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            email: Some(profile.email.clone()),
            username: None,
            name: profile.name.clone(),
            role: Role::User,
            user_id: Some(profile.id.clone()),
            remember_me,
            iat,
            exp: iat + user_token_ttl(remember_me),
        }
    }

    // Same identity with a fresh issue time and expiry.
    pub fn renewed(&self, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iat,
            exp: iat + self.ttl_seconds(),
            ..self.clone()
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        match self.role {
            Role::Admin => ADMIN_TOKEN_TTL_SECONDS,
            Role::User => user_token_ttl(self.remember_me),
        }
    }
}

pub fn user_token_ttl(remember_me: bool) -> i64 {
    if remember_me {
        REMEMBER_ME_TOKEN_TTL_SECONDS
    } else {
        USER_TOKEN_TTL_SECONDS
    }
}
