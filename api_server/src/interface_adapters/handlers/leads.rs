use axum::Json;
use axum::extract::State;
use std::sync::Arc;

use crate::domain::ClientInfo;
use crate::interface_adapters::errors::ApiError;
use crate::interface_adapters::extract::ApiJson;
use crate::interface_adapters::protocol::{
    AiChatRequest, AiChatResponse, CaptureLeadRequest, CaptureLeadResponse, ContactRequest,
    ContactResponse,
};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::ai_chat::AiChatUseCase;
use crate::use_cases::capture_lead::CaptureLeadUseCase;
use crate::use_cases::contact::ContactUseCase;

// Handler for the registration / lead form. Succeeds even when the workflow is down.
#[tracing::instrument(skip_all)]
pub async fn capture_lead(
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    ApiJson(payload): ApiJson<CaptureLeadRequest>,
) -> Result<Json<CaptureLeadResponse>, ApiError> {
    let use_case = CaptureLeadUseCase {
        gateway: state.gateway.as_ref(),
        clock: SystemClock,
    };

    let result = use_case.execute(payload, client).await?;
    tracing::info!(lead_id = %result.lead_id, forwarded = result.forwarded, "lead captured");

    Ok(Json(CaptureLeadResponse {
        success: true,
        message: "Registration successful! We'll be in touch soon.".to_string(),
        lead_id: result.lead_id,
        forwarded: result.forwarded,
    }))
}

#[tracing::instrument(skip_all)]
pub async fn contact(
    State(state): State<Arc<AppState>>,
    client: ClientInfo,
    ApiJson(payload): ApiJson<ContactRequest>,
) -> Result<Json<ContactResponse>, ApiError> {
    let use_case = ContactUseCase {
        gateway: state.gateway.as_ref(),
        clock: SystemClock,
    };

    let forwarded = use_case.execute(payload, client).await?;

    Ok(Json(ContactResponse {
        success: true,
        message: "Thanks for reaching out! We'll reply within 24 hours.".to_string(),
        forwarded,
    }))
}

#[tracing::instrument(skip_all)]
pub async fn ai_chat(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<AiChatRequest>,
) -> Result<Json<AiChatResponse>, ApiError> {
    let use_case = AiChatUseCase {
        gateway: state.gateway.as_ref(),
        clock: SystemClock,
        settings: &state.default_settings,
    };

    let reply = use_case.execute(payload).await?;

    Ok(Json(AiChatResponse {
        success: true,
        reply: reply.reply,
        source: reply.source,
    }))
}
