use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::interface_adapters::errors::ApiError;
use crate::interface_adapters::extract::{AdminClaims, ApiJson};
use crate::interface_adapters::protocol::{
    AdminDashboardResponse, AdminLoginRequest, AdminLoginResponse, AdminUser, AnalyticsResponse,
    TokenResponse,
};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::admin::{AdminDashboardUseCase, AdminLoginUseCase};
use crate::use_cases::analytics::AnalyticsUseCase;
use crate::use_cases::user_auth::RefreshSessionUseCase;

// Handler for the admin panel sign-in. Wrong credentials are answered slowly.
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<AdminLoginRequest>,
) -> Result<Json<AdminLoginResponse>, ApiError> {
    let use_case = AdminLoginUseCase {
        clock: SystemClock,
        tokens: &state.tokens,
        hasher: &state.hasher,
        credentials: &state.admin,
        failure_delay: state.failed_login_delay,
    };

    let session = use_case.execute(payload).await.inspect_err(|err| {
        tracing::warn!(error = %err, "admin login rejected");
    })?;
    tracing::info!("admin signed in");

    let claims = session.claims;
    Ok(Json(AdminLoginResponse {
        success: true,
        token: session.token,
        expires_in: claims.ttl_seconds(),
        user: AdminUser {
            username: claims.username.unwrap_or_default(),
            name: claims.name,
            role: claims.role,
        },
    }))
}

#[tracing::instrument(skip_all)]
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    AdminClaims(_claims): AdminClaims,
) -> Json<AdminDashboardResponse> {
    let use_case = AdminDashboardUseCase {
        clock: SystemClock,
        settings: &state.default_settings,
    };

    Json(AdminDashboardResponse {
        success: true,
        stats: use_case.execute(),
    })
}

#[tracing::instrument(skip_all)]
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    AdminClaims(claims): AdminClaims,
) -> Result<Json<TokenResponse>, ApiError> {
    let use_case = RefreshSessionUseCase {
        clock: SystemClock,
        tokens: &state.tokens,
    };

    let (token, renewed) = use_case.execute(&claims)?;

    Ok(Json(TokenResponse {
        success: true,
        token,
        expires_in: renewed.ttl_seconds(),
    }))
}

#[tracing::instrument(skip_all)]
pub async fn analytics(
    State(state): State<Arc<AppState>>,
    AdminClaims(_claims): AdminClaims,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let use_case = AnalyticsUseCase {
        sheet: state.sheets.as_ref(),
        clock: SystemClock,
    };

    let metrics = use_case.execute().await?;

    Ok(Json(AnalyticsResponse {
        success: true,
        metrics,
    }))
}
