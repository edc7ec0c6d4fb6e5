// The session token travels either as a bearer header or in the `authToken` cookie.

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use crate::interface_adapters::errors::ApiError;

pub const AUTH_COOKIE: &str = "authToken";

// Bearer header first, then the cookie.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == AUTH_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

pub fn session_cookie(token: &str, max_age_seconds: i64, secure: bool) -> Result<HeaderValue, ApiError> {
    build(token, max_age_seconds, secure)
}

pub fn cleared_cookie(secure: bool) -> Result<HeaderValue, ApiError> {
    build("", 0, secure)
}

fn build(value: &str, max_age_seconds: i64, secure: bool) -> Result<HeaderValue, ApiError> {
    let mut cookie =
        format!("{AUTH_COOKIE}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_seconds}");
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|err| ApiError::Internal(format!("bad cookie: {err}")))
}
