use crate::domain::validation::Validator;
use crate::domain::{ClientInfo, Clock, ContactMessage, ValidationError, Webhook, WorkflowGateway};
use crate::interface_adapters::protocol::ContactRequest;
use crate::use_cases::to_payload;

// Contact form use case; workflow failures are logged and swallowed.
pub struct ContactUseCase<'a, G: ?Sized, C> {
    pub gateway: &'a G,
    pub clock: C,
}

impl<G, C> ContactUseCase<'_, G, C>
where
    G: WorkflowGateway + ?Sized,
    C: Clock,
{
    // Returns whether the message reached the workflow.
    pub async fn execute(
        &self,
        payload: ContactRequest,
        client: ClientInfo,
    ) -> Result<bool, ValidationError> {
        let mut validator = Validator::new();
        let name = validator.required_text("name", payload.name.as_deref(), 2, 100);
        let email = validator.email("email", payload.email.as_deref());
        let subject = validator.optional_text("subject", payload.subject.as_deref(), 200);
        let message = validator.required_text("message", payload.message.as_deref(), 10, 2000);
        validator.finish()?;

        let contact = ContactMessage {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            subject,
            message: message.unwrap_or_default(),
            timestamp: self.clock.now(),
            ip: client.ip,
            user_agent: client.user_agent,
        };

        match self.gateway.post(Webhook::Contact, to_payload(&contact)).await {
            Ok(_) => Ok(true),
            Err(err) => {
                tracing::warn!(error = %err, "contact forward failed; answering locally");
                Ok(false)
            }
        }
    }
}
