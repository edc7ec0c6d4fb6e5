use axum::Json;
use axum::extract::State;
use chrono::Utc;
use std::sync::Arc;

use crate::interface_adapters::protocol::{HealthResponse, WebinarInfoResponse};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::webinar_info::WebinarInfoUseCase;

#[tracing::instrument(skip_all)]
pub async fn webinar_info(State(state): State<Arc<AppState>>) -> Json<WebinarInfoResponse> {
    let use_case = WebinarInfoUseCase {
        clock: SystemClock,
        settings: &state.default_settings,
    };

    Json(WebinarInfoResponse {
        success: true,
        info: use_case.execute(),
    })
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        status: "ok",
        environment: state.environment.clone(),
        timestamp: Utc::now(),
    })
}
