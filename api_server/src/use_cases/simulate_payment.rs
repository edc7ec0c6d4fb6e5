use uuid::Uuid;

use crate::domain::validation::Validator;
use crate::domain::{
    Clock, GatewayError, PaymentError, PaymentSimulation, PaymentStatus, Webhook,
    WorkflowGateway,
};
use crate::interface_adapters::protocol::SimulatePaymentRequest;
use crate::use_cases::to_payload;

// Response returned by the payment simulation use case.
#[derive(Debug)]
pub struct PaymentOutcome {
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub confirmation_pending: bool,
    // Whether the workflow stored the payment.
    pub recorded: bool,
}

impl PaymentOutcome {
    pub fn succeeded(&self) -> bool {
        self.status != PaymentStatus::Failed
    }

    pub fn message(&self) -> &'static str {
        match (self.status, self.recorded) {
            (PaymentStatus::NeedTimeToConfirm, _) => {
                "Payment received. Confirmation may take a few minutes."
            }
            (PaymentStatus::Success, true) => "Payment successful. Welcome aboard!",
            (PaymentStatus::Success, false) => {
                "Payment successful. Your registration will be confirmed shortly."
            }
            (PaymentStatus::Failed, _) => "Payment failed. Please try again.",
        }
    }
}

// Mock payment flow forwarded to the payment workflow.
pub struct SimulatePaymentUseCase<'a, G: ?Sized, C> {
    pub gateway: &'a G,
    pub clock: C,
}

impl<G, C> SimulatePaymentUseCase<'_, G, C>
where
    G: WorkflowGateway + ?Sized,
    C: Clock,
{
    pub async fn execute(
        &self,
        payload: SimulatePaymentRequest,
    ) -> Result<PaymentOutcome, PaymentError> {
        let payment = self.validate(payload)?;
        let status = payment.status;
        let transaction_id = payment.transaction_id.clone();

        let result = self
            .gateway
            .post(Webhook::SimulatePayment, to_payload(&payment))
            .await;

        // Pending confirmations never depend on the workflow.
        if status == PaymentStatus::NeedTimeToConfirm {
            if let Err(err) = &result {
                tracing::warn!(%transaction_id, error = %err, "pending payment forward failed");
            }
            return Ok(PaymentOutcome {
                status,
                transaction_id,
                confirmation_pending: true,
                recorded: result.is_ok(),
            });
        }

        let recorded = match result {
            Ok(_) => true,
            Err(GatewayError::Rejected { status, .. }) => {
                tracing::warn!(%transaction_id, status, "payment workflow rejected the request");
                return Err(PaymentError::Rejected { status });
            }
            Err(err) => {
                tracing::warn!(%transaction_id, error = %err, "payment forward failed; using fallback");
                false
            }
        };

        Ok(PaymentOutcome {
            status,
            transaction_id,
            confirmation_pending: false,
            recorded,
        })
    }

    fn validate(&self, payload: SimulatePaymentRequest) -> Result<PaymentSimulation, PaymentError> {
        let mut validator = Validator::new();
        let email = validator.email("email", payload.email.as_deref());
        let status = match payload.status.as_deref().map(str::trim) {
            None | Some("") => {
                validator.reject("status", "Status is required");
                None
            }
            Some(value) => {
                let parsed = PaymentStatus::parse(value);
                if parsed.is_none() {
                    validator.reject(
                        "status",
                        "Status must be one of success, failed, need_time_to_confirm",
                    );
                }
                parsed
            }
        };
        let amount = validator.non_negative("amount", payload.amount);
        let transaction_id =
            validator.optional_text("transaction_id", payload.transaction_id.as_deref(), 100);
        let coupon_code = validator.optional_text("coupon_code", payload.coupon_code.as_deref(), 50);
        let discount_amount =
            validator.optional_non_negative("discount_amount", payload.discount_amount);
        let original_amount =
            validator.optional_non_negative("original_amount", payload.original_amount);
        validator.finish()?;

        Ok(PaymentSimulation {
            email: email.unwrap_or_default(),
            status: status.unwrap_or(PaymentStatus::Failed),
            transaction_id: transaction_id.unwrap_or_else(new_transaction_id),
            amount: amount.unwrap_or_default(),
            coupon_code: coupon_code.map(|code| code.to_uppercase()),
            discount_amount,
            original_amount,
            timestamp: self.clock.now(),
        })
    }
}

fn new_transaction_id() -> String {
    format!("TXN_{}", Uuid::new_v4().simple()).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{FixedClock, ScriptedGateway};
    use serde_json::json;

    fn request(status: &str) -> SimulatePaymentRequest {
        SimulatePaymentRequest {
            email: Some("asha@example.com".to_string()),
            status: Some(status.to_string()),
            amount: Some(499.0),
            transaction_id: None,
            coupon_code: Some("early50".to_string()),
            discount_amount: Some(50.0),
            original_amount: Some(549.0),
        }
    }

    #[tokio::test]
    async fn when_payment_needs_confirmation_and_workflow_is_down_then_pending_is_returned() {
        let use_case = SimulatePaymentUseCase {
            gateway: &ScriptedGateway::new(),
            clock: FixedClock::monday_morning(),
        };

        let outcome = use_case
            .execute(request("need_time_to_confirm"))
            .await
            .expect("expected pending payment to succeed");

        assert!(outcome.confirmation_pending);
        assert!(outcome.succeeded());
        assert!(!outcome.recorded);
    }

    #[tokio::test]
    async fn when_payment_needs_confirmation_and_workflow_rejects_then_pending_is_still_returned() {
        let gateway = ScriptedGateway::new().fail(
            Webhook::SimulatePayment,
            GatewayError::Rejected {
                status: 400,
                message: None,
            },
        );
        let use_case = SimulatePaymentUseCase {
            gateway: &gateway,
            clock: FixedClock::monday_morning(),
        };

        let outcome = use_case
            .execute(request("need_time_to_confirm"))
            .await
            .expect("expected pending payment to succeed");

        assert!(outcome.confirmation_pending);
    }

    #[tokio::test]
    async fn when_payment_succeeds_then_generated_transaction_id_is_forwarded() {
        let gateway = ScriptedGateway::new().reply(Webhook::SimulatePayment, json!({"ok": true}));
        let use_case = SimulatePaymentUseCase {
            gateway: &gateway,
            clock: FixedClock::monday_morning(),
        };

        let outcome = use_case
            .execute(request("success"))
            .await
            .expect("expected payment to succeed");

        assert!(outcome.recorded);
        assert!(!outcome.confirmation_pending);
        assert!(outcome.transaction_id.starts_with("TXN_"));
        let sent = gateway.last_payload(Webhook::SimulatePayment).unwrap();
        assert_eq!(sent["transaction_id"], outcome.transaction_id.as_str());
        assert_eq!(sent["status"], "success");
        assert_eq!(sent["coupon_code"], "EARLY50");
    }

    #[tokio::test]
    async fn when_workflow_is_down_then_success_falls_back_unrecorded() {
        let use_case = SimulatePaymentUseCase {
            gateway: &ScriptedGateway::new(),
            clock: FixedClock::monday_morning(),
        };

        let outcome = use_case
            .execute(request("success"))
            .await
            .expect("expected fallback outcome");

        assert!(outcome.succeeded());
        assert!(!outcome.recorded);
    }

    #[tokio::test]
    async fn when_workflow_rejects_failed_payment_then_status_is_passed_through() {
        let gateway = ScriptedGateway::new().fail(
            Webhook::SimulatePayment,
            GatewayError::Rejected {
                status: 409,
                message: Some("duplicate".to_string()),
            },
        );
        let use_case = SimulatePaymentUseCase {
            gateway: &gateway,
            clock: FixedClock::monday_morning(),
        };

        let err = use_case
            .execute(request("failed"))
            .await
            .expect_err("expected rejection");

        assert!(matches!(err, PaymentError::Rejected { status: 409 }));
    }

    #[tokio::test]
    async fn when_status_is_unknown_then_validation_fails() {
        let use_case = SimulatePaymentUseCase {
            gateway: &ScriptedGateway::new(),
            clock: FixedClock::monday_morning(),
        };

        let err = use_case
            .execute(request("pending"))
            .await
            .expect_err("expected validation failure");

        match err {
            PaymentError::Invalid(err) => assert!(err.names("status")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
