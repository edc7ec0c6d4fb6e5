use axum::Json;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderValue, StatusCode};
use std::sync::Arc;

use crate::domain::AuthError;
use crate::interface_adapters::cookies::{cleared_cookie, session_cookie};
use crate::interface_adapters::errors::ApiError;
use crate::interface_adapters::extract::{ApiJson, SessionClaims};
use crate::interface_adapters::protocol::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, TokenResponse, VerifyResponse,
};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::user_auth::{
    LoginUseCase, RefreshSessionUseCase, RegisterUseCase, UserSession,
};

type WithCookie<T> = (StatusCode, [(axum::http::HeaderName, HeaderValue); 1], Json<T>);

#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<WithCookie<AuthResponse>, ApiError> {
    let use_case = RegisterUseCase {
        gateway: state.gateway.as_ref(),
        clock: SystemClock,
        tokens: &state.tokens,
        hasher: &state.hasher,
    };

    let session = use_case.execute(payload).await?;

    session_response(&state, StatusCode::CREATED, session)
}

#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<WithCookie<AuthResponse>, ApiError> {
    let use_case = LoginUseCase {
        gateway: state.gateway.as_ref(),
        clock: SystemClock,
        tokens: &state.tokens,
        hasher: &state.hasher,
    };

    let session = use_case.execute(payload).await.map_err(|err| match err {
        AuthError::InvalidCredentials => ApiError::Unauthorized("Invalid email or password"),
        other => other.into(),
    })?;
    tracing::info!(user_id = %session.user.id, "user signed in");

    session_response(&state, StatusCode::OK, session)
}

pub async fn verify(SessionClaims(claims): SessionClaims) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        success: true,
        user: claims.into(),
    })
}

#[tracing::instrument(skip_all)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    SessionClaims(claims): SessionClaims,
) -> Result<WithCookie<TokenResponse>, ApiError> {
    let use_case = RefreshSessionUseCase {
        clock: SystemClock,
        tokens: &state.tokens,
    };

    let (token, renewed) = use_case.execute(&claims)?;
    let expires_in = renewed.ttl_seconds();
    let cookie = session_cookie(&token, expires_in, state.secure_cookies)?;

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(TokenResponse {
            success: true,
            token,
            expires_in,
        }),
    ))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
) -> Result<WithCookie<MessageResponse>, ApiError> {
    let cookie = cleared_cookie(state.secure_cookies)?;

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(MessageResponse {
            success: true,
            message: "Logged out successfully".to_string(),
        }),
    ))
}

fn session_response(
    state: &AppState,
    status: StatusCode,
    session: UserSession,
) -> Result<WithCookie<AuthResponse>, ApiError> {
    let expires_in = session.claims.ttl_seconds();
    let cookie = session_cookie(&session.token, expires_in, state.secure_cookies)?;

    Ok((
        status,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            success: true,
            token: session.token,
            expires_in,
            user: session.user,
        }),
    ))
}
