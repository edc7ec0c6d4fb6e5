// Request extractors shared by the handlers.

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::sync::Arc;

use crate::domain::{Claims, ClientInfo, Role};
use crate::interface_adapters::cookies::token_from_headers;
use crate::interface_adapters::errors::ApiError;
use crate::interface_adapters::state::AppState;
use crate::use_cases::verify_token::VerifyTokenUseCase;

// JSON body whose rejection uses the API error envelope instead of axum's plain text.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| ApiJson(value))
            .map_err(|rejection| ApiError::MalformedJson(rejection.body_text()))
    }
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(client_info(&parts.headers))
    }
}

// First X-Forwarded-For hop, then X-Real-IP.
pub fn client_info(headers: &HeaderMap) -> ClientInfo {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    let ip = header("x-forwarded-for")
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| header("x-real-ip"));
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());

    let defaults = ClientInfo::default();
    ClientInfo {
        ip: ip.map(str::to_string).unwrap_or(defaults.ip),
        user_agent: user_agent.map(str::to_string).unwrap_or(defaults.user_agent),
    }
}

fn verify(parts: &Parts, state: &AppState, required: Option<Role>) -> Result<Claims, ApiError> {
    let token = token_from_headers(&parts.headers);
    let use_case = VerifyTokenUseCase {
        tokens: &state.tokens,
    };
    use_case
        .execute(token.as_deref(), required)
        .map_err(ApiError::from)
}

/// Verified claims of any signed-in identity.
pub struct SessionClaims(pub Claims);

impl FromRequestParts<Arc<AppState>> for SessionClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        verify(parts, state, None).map(SessionClaims)
    }
}

/// Verified claims carrying the admin role.
pub struct AdminClaims(pub Claims);

impl FromRequestParts<Arc<AppState>> for AdminClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        verify(parts, state, Some(Role::Admin)).map(AdminClaims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn when_forwarded_for_has_several_hops_then_first_is_used() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.5"));

        let info = client_info(&headers);

        assert_eq!(info.ip, "203.0.113.7");
        assert_eq!(info.user_agent, "curl/8.5");
    }

    #[test]
    fn when_only_real_ip_is_set_then_it_is_used() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));

        assert_eq!(client_info(&headers).ip, "198.51.100.4");
    }

    #[test]
    fn when_no_headers_are_set_then_values_are_unknown() {
        let info = client_info(&HeaderMap::new());

        assert_eq!(info.ip, "unknown");
        assert_eq!(info.user_agent, "unknown");
    }
}
