use crate::domain::upstream::parse_coupon;
use crate::domain::validation::Validator;
use crate::domain::{CouponCheck, GatewayError, ValidationError, Webhook, WorkflowGateway};
use crate::interface_adapters::protocol::ValidateCouponRequest;
use crate::use_cases::to_payload;

pub const INVALID_COUPON_MESSAGE: &str = "Invalid or expired coupon code";
pub const USED_COUPON_MESSAGE: &str = "Coupon has already been used";
pub const COUPON_UNAVAILABLE_MESSAGE: &str =
    "Coupon service is temporarily unavailable. Please try again later.";

#[derive(Debug, PartialEq)]
pub enum CouponOutcome {
    Applied {
        code: String,
        discount_percent: Option<f64>,
        discount_amount: Option<f64>,
        final_amount: Option<f64>,
        message: String,
    },
    Rejected {
        message: String,
    },
    // The coupon workflow could not give an answer.
    Unavailable,
}

// Coupon validation against the coupon workflow. Only validation errors escape.
pub struct ValidateCouponUseCase<'a, G: ?Sized> {
    pub gateway: &'a G,
}

impl<G> ValidateCouponUseCase<'_, G>
where
    G: WorkflowGateway + ?Sized,
{
    pub async fn execute(
        &self,
        payload: ValidateCouponRequest,
    ) -> Result<CouponOutcome, ValidationError> {
        let mut validator = Validator::new();
        let code = validator.required_text("code", payload.code.as_deref(), 3, 50);
        let email = validator.optional_email("email", payload.email.as_deref());
        let amount = validator.optional_non_negative("amount", payload.amount);
        validator.finish()?;

        let check = CouponCheck {
            code: code.unwrap_or_default().to_uppercase(),
            email,
            amount,
        };

        let reply = match self
            .gateway
            .post(Webhook::ValidateCoupon, to_payload(&check))
            .await
        {
            Ok(value) => value,
            Err(GatewayError::Rejected { status: 404, .. }) => {
                return Ok(rejected(INVALID_COUPON_MESSAGE));
            }
            Err(GatewayError::Rejected { status: 409, .. }) => {
                return Ok(rejected(USED_COUPON_MESSAGE));
            }
            Err(GatewayError::Rejected { status, message }) => {
                tracing::warn!(status, upstream_message = ?message, "coupon workflow rejected the request");
                return Ok(rejected(INVALID_COUPON_MESSAGE));
            }
            Err(err) => {
                tracing::warn!(error = %err, "coupon workflow unavailable");
                return Ok(CouponOutcome::Unavailable);
            }
        };

        let reply = match parse_coupon(reply) {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "coupon workflow reply had an unknown shape");
                return Ok(CouponOutcome::Unavailable);
            }
        };

        if !reply.valid {
            tracing::debug!(upstream_message = ?reply.message, "coupon workflow marked code invalid");
            return Ok(rejected(INVALID_COUPON_MESSAGE));
        }

        // Fill in whatever the workflow left out from percent and amount.
        let discount_amount = reply.discount_amount.or_else(|| {
            let percent = reply.discount_percent?;
            Some(round_money(check.amount? * percent / 100.0))
        });
        let final_amount = reply.final_amount.or_else(|| {
            let amount = check.amount?;
            Some(round_money((amount - discount_amount?).max(0.0)))
        });

        Ok(CouponOutcome::Applied {
            code: check.code,
            discount_percent: reply.discount_percent,
            discount_amount,
            final_amount,
            message: reply
                .message
                .unwrap_or_else(|| "Coupon applied successfully".to_string()),
        })
    }
}

fn rejected(message: &str) -> CouponOutcome {
    CouponOutcome::Rejected {
        message: message.to_string(),
    }
}

fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
