use uuid::Uuid;

use crate::domain::validation::Validator;
use crate::domain::{ClientInfo, Clock, Lead, ValidationError, Webhook, WorkflowGateway};
use crate::interface_adapters::protocol::CaptureLeadRequest;
use crate::use_cases::to_payload;

const DEFAULT_SOURCE: &str = "website";

// Response returned by the lead capture use case.
#[derive(Debug)]
pub struct CaptureLeadResponse {
    pub lead_id: String,
    pub forwarded: bool,
}

// Lead capture use case. Forwarding is best effort: the visitor always sees success.
pub struct CaptureLeadUseCase<'a, G: ?Sized, C> {
    pub gateway: &'a G,
    pub clock: C,
}

impl<G, C> CaptureLeadUseCase<'_, G, C>
where
    G: WorkflowGateway + ?Sized,
    C: Clock,
{
    pub async fn execute(
        &self,
        payload: CaptureLeadRequest,
        client: ClientInfo,
    ) -> Result<CaptureLeadResponse, ValidationError> {
        let lead = self.validate(payload, client)?;
        let lead_id = lead.lead_id.clone();

        let forwarded = match self
            .gateway
            .post(Webhook::CaptureLead, to_payload(&lead))
            .await
        {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(%lead_id, error = %err, "lead forward failed; answering locally");
                false
            }
        };

        Ok(CaptureLeadResponse { lead_id, forwarded })
    }

    fn validate(
        &self,
        payload: CaptureLeadRequest,
        client: ClientInfo,
    ) -> Result<Lead, ValidationError> {
        let mut validator = Validator::new();
        let name = validator.required_text("name", payload.name.as_deref(), 2, 100);
        let email = validator.email("email", payload.email.as_deref());
        let phone = validator.optional_phone("phone", payload.phone.as_deref());
        let role = validator.optional_text("role", payload.role.as_deref(), 50);
        let source = validator.optional_text("source", payload.source.as_deref(), 50);
        validator.finish()?;

        Ok(Lead {
            lead_id: Uuid::new_v4().to_string(),
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            phone,
            role,
            source: source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            timestamp: self.clock.now(),
            ip: client.ip,
            user_agent: client.user_agent,
        })
    }
}
