use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::claims::Claims;
use crate::domain::errors::{AuthError, GatewayError};

// Webhooks exposed by the automation workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Webhook {
    CaptureLead,
    Contact,
    AiChat,
    SimulatePayment,
    ValidateCoupon,
    AuthRegister,
    AuthLogin,
    GetSettings,
    UpdateSettings,
}

impl Webhook {
    // Path relative to the workflow base URL.
    pub fn path(self) -> &'static str {
        match self {
            Webhook::CaptureLead => "capture-lead",
            Webhook::Contact => "contact",
            Webhook::AiChat => "ai-chat",
            Webhook::SimulatePayment => "simulate-payment",
            Webhook::ValidateCoupon => "validate-coupon",
            Webhook::AuthRegister => "auth/register",
            Webhook::AuthLogin => "auth/login",
            Webhook::GetSettings => "get-settings",
            Webhook::UpdateSettings => "update-settings",
        }
    }
}

// Port for the external automation workflow. Use cases depend on this, not on reqwest.
#[async_trait]
pub trait WorkflowGateway: Send + Sync {
    async fn post(&self, webhook: Webhook, payload: Value) -> Result<Value, GatewayError>;
    async fn get(&self, webhook: Webhook) -> Result<Value, GatewayError>;
}

// Port for the published analytics spreadsheet.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_csv(&self) -> Result<String, GatewayError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

// Port for signing and verifying session tokens.
pub trait TokenCodec: Send + Sync {
    fn issue(&self, claims: &Claims) -> Result<String, AuthError>;
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}

// Port for salted password hashing. Implementations may be CPU heavy.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plain: &str) -> Result<String, AuthError>;
    async fn verify(&self, plain: &str, stored_hash: &str) -> bool;
}
