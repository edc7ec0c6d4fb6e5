use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::domain::SettingsPatch;
use crate::interface_adapters::errors::ApiError;
use crate::interface_adapters::extract::{AdminClaims, ApiJson};
use crate::interface_adapters::protocol::{SettingsResponse, SettingsSource};
use crate::interface_adapters::state::AppState;
use crate::use_cases::settings::{GetSettingsUseCase, UpdateSettingsUseCase};

// Serves both /api/settings and /api/admin-config.
#[tracing::instrument(skip_all)]
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    let use_case = GetSettingsUseCase {
        gateway: state.gateway.as_ref(),
        defaults: &state.default_settings,
    };

    let loaded = use_case.execute().await;

    Json(SettingsResponse {
        success: true,
        settings: loaded.settings,
        source: loaded.source,
    })
}

#[tracing::instrument(skip_all)]
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    AdminClaims(claims): AdminClaims,
    ApiJson(patch): ApiJson<SettingsPatch>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let use_case = UpdateSettingsUseCase {
        gateway: state.gateway.as_ref(),
        defaults: &state.default_settings,
    };

    let settings = use_case.execute(patch).await?;
    tracing::info!(admin = ?claims.username, "settings updated");

    Ok(Json(SettingsResponse {
        success: true,
        settings,
        source: SettingsSource::Workflow,
    }))
}
