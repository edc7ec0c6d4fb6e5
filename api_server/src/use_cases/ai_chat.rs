use crate::domain::upstream::parse_chat_reply;
use crate::domain::validation::Validator;
use crate::domain::{ChatMessage, Clock, Settings, ValidationError, Webhook, WorkflowGateway};
use crate::interface_adapters::protocol::{AiChatRequest, ReplySource};
use crate::use_cases::to_payload;

#[derive(Debug)]
pub struct ChatReply {
    pub reply: String,
    pub source: ReplySource,
}

// Chat use case: asks the workflow, answers from canned replies when it cannot.
pub struct AiChatUseCase<'a, G: ?Sized, C> {
    pub gateway: &'a G,
    pub clock: C,
    pub settings: &'a Settings,
}

impl<G, C> AiChatUseCase<'_, G, C>
where
    G: WorkflowGateway + ?Sized,
    C: Clock,
{
    pub async fn execute(&self, payload: AiChatRequest) -> Result<ChatReply, ValidationError> {
        let mut validator = Validator::new();
        let message = validator.required_text("message", payload.message.as_deref(), 1, 1000);
        let session_id = validator.optional_text("session_id", payload.session_id.as_deref(), 100);
        let email = validator.optional_email("email", payload.email.as_deref());
        validator.finish()?;

        let chat = ChatMessage {
            message: message.unwrap_or_default(),
            session_id,
            email,
            timestamp: self.clock.now(),
        };

        match self.gateway.post(Webhook::AiChat, to_payload(&chat)).await {
            Ok(value) => {
                if let Some(reply) = parse_chat_reply(value) {
                    return Ok(ChatReply {
                        reply,
                        source: ReplySource::Ai,
                    });
                }
                tracing::warn!("chat workflow reply had no usable text");
            }
            Err(err) => tracing::warn!(error = %err, "chat workflow unavailable"),
        }

        Ok(ChatReply {
            reply: fallback_reply(&chat.message, self.settings),
            source: ReplySource::Fallback,
        })
    }
}

// Canned answer picked by keyword.
pub fn fallback_reply(message: &str, settings: &Settings) -> String {
    let text = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|word| text.contains(word));

    if mentions(&["price", "fee", "cost", "pay"]) {
        format!(
            "The 5-day Python Full Stack webinar costs {} {} (regular price {} {}). \
             Apply a coupon at checkout if you have one.",
            settings.currency, settings.price, settings.currency, settings.original_price
        )
    } else if mentions(&["date", "when", "schedule", "time", "start"]) {
        format!(
            "The next batch starts {} at {}. Registration closes {}.",
            settings.webinar_date, settings.webinar_time, settings.registration_deadline
        )
    } else if mentions(&["refund", "cancel"]) {
        format!(
            "For refunds or cancellations, write to {} with your transaction ID.",
            settings.contact_email
        )
    } else if mentions(&["certificate"]) {
        "Every attendee who completes all five days receives a certificate of completion."
            .to_string()
    } else if mentions(&["recording", "replay", "miss"]) {
        "Recordings of every session are shared with registered attendees after each day."
            .to_string()
    } else if mentions(&["syllabus", "topic", "curriculum", "learn", "module"]) {
        "Day 1: Python fundamentals. Day 2: Django and REST APIs. Day 3: databases. \
         Day 4: React frontend. Day 5: deployment and a capstone project."
            .to_string()
    } else {
        format!(
            "Thanks for your question! Our team will get back to you shortly. \
             You can also reach us at {} or on WhatsApp.",
            settings.contact_email
        )
    }
}
