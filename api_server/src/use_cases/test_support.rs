use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::domain::{
    AuthError, Claims, Clock, GatewayError, PasswordHasher, SheetSource, TokenCodec, Webhook,
    WorkflowGateway,
};

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl FixedClock {
    // Monday 2 March 2026, 10:00 UTC.
    pub(crate) fn monday_morning() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub(crate) type CallLog = Arc<Mutex<Vec<(Webhook, Option<Value>)>>>;

// Gateway fake with scripted replies per webhook. Unscripted webhooks are unavailable.
#[derive(Clone, Default)]
pub(crate) struct ScriptedGateway {
    replies: HashMap<Webhook, Result<Value, GatewayError>>,
    calls: CallLog,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, webhook: Webhook, value: Value) -> Self {
        self.replies.insert(webhook, Ok(value));
        self
    }

    pub(crate) fn fail(mut self, webhook: Webhook, err: GatewayError) -> Self {
        self.replies.insert(webhook, Err(err));
        self
    }

    pub(crate) fn calls(&self) -> Vec<(Webhook, Option<Value>)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(crate) fn last_payload(&self, webhook: Webhook) -> Option<Value> {
        self.calls()
            .into_iter()
            .rev()
            .find(|(called, _)| *called == webhook)
            .and_then(|(_, payload)| payload)
    }

    fn answer(&self, webhook: Webhook, payload: Option<Value>) -> Result<Value, GatewayError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push((webhook, payload));
        self.replies
            .get(&webhook)
            .cloned()
            .unwrap_or_else(|| Err(GatewayError::Unavailable("connection refused".to_string())))
    }
}

#[async_trait]
impl WorkflowGateway for ScriptedGateway {
    async fn post(&self, webhook: Webhook, payload: Value) -> Result<Value, GatewayError> {
        self.answer(webhook, Some(payload))
    }

    async fn get(&self, webhook: Webhook) -> Result<Value, GatewayError> {
        self.answer(webhook, None)
    }
}

pub(crate) struct FakeSheet(pub(crate) Result<String, GatewayError>);

#[async_trait]
impl SheetSource for FakeSheet {
    async fn fetch_csv(&self) -> Result<String, GatewayError> {
        self.0.clone()
    }
}

// Reversible "hash" so tests can assert on what was forwarded.
pub(crate) struct PlainHasher;

#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, plain: &str) -> Result<String, AuthError> {
        Ok(format!("hashed:{plain}"))
    }

    async fn verify(&self, plain: &str, stored_hash: &str) -> bool {
        stored_hash == format!("hashed:{plain}")
    }
}

// Token codec that serializes claims as JSON, without signing.
pub(crate) struct JsonTokens;

impl TokenCodec for JsonTokens {
    fn issue(&self, claims: &Claims) -> Result<String, AuthError> {
        serde_json::to_string(claims).map_err(|err| AuthError::Signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        serde_json::from_str(token).map_err(|_| AuthError::InvalidToken)
    }
}
