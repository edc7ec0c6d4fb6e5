use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;

use crate::interface_adapters::errors::ApiError;
use crate::interface_adapters::extract::ApiJson;
use crate::interface_adapters::protocol::{
    SimulatePaymentRequest, SimulatePaymentResponse, ValidateCouponRequest,
    ValidateCouponResponse,
};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::simulate_payment::SimulatePaymentUseCase;
use crate::use_cases::validate_coupon::{
    COUPON_UNAVAILABLE_MESSAGE, CouponOutcome, ValidateCouponUseCase,
};

#[tracing::instrument(skip_all)]
pub async fn simulate_payment(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<SimulatePaymentRequest>,
) -> Result<Json<SimulatePaymentResponse>, ApiError> {
    let use_case = SimulatePaymentUseCase {
        gateway: state.gateway.as_ref(),
        clock: SystemClock,
    };

    let outcome = use_case.execute(payload).await?;
    tracing::info!(
        transaction_id = %outcome.transaction_id,
        status = outcome.status.as_str(),
        recorded = outcome.recorded,
        "payment simulated"
    );

    Ok(Json(SimulatePaymentResponse {
        success: outcome.succeeded(),
        status: outcome.status.as_str().to_string(),
        message: outcome.message().to_string(),
        transaction_id: outcome.transaction_id,
        confirmation_pending: outcome.confirmation_pending,
        recorded: outcome.recorded,
    }))
}

// Coupon answers are 200 unless the coupon service itself could not answer.
#[tracing::instrument(skip_all)]
pub async fn validate_coupon(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<ValidateCouponRequest>,
) -> Result<(StatusCode, Json<ValidateCouponResponse>), ApiError> {
    let use_case = ValidateCouponUseCase {
        gateway: state.gateway.as_ref(),
    };

    let (status, body) = match use_case.execute(payload).await? {
        CouponOutcome::Applied {
            code,
            discount_percent,
            discount_amount,
            final_amount,
            message,
        } => (
            StatusCode::OK,
            ValidateCouponResponse {
                success: true,
                code: Some(code),
                discount_percent,
                discount_amount,
                final_amount,
                message,
            },
        ),
        CouponOutcome::Rejected { message } => (StatusCode::OK, rejected(message)),
        CouponOutcome::Unavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            rejected(COUPON_UNAVAILABLE_MESSAGE.to_string()),
        ),
    };

    Ok((status, Json(body)))
}

fn rejected(message: String) -> ValidateCouponResponse {
    ValidateCouponResponse {
        success: false,
        code: None,
        discount_percent: None,
        discount_amount: None,
        final_amount: None,
        message,
    }
}
