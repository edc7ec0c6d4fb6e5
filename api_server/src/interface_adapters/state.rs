use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{Clock, SheetSource, Settings, WorkflowGateway};
use crate::interface_adapters::security::{Argon2Hasher, JwtCodec};
use crate::use_cases::admin::AdminCredentials;

// Shared, read-only application state. Nothing in here changes after startup.
pub struct AppState {
    pub gateway: Arc<dyn WorkflowGateway>,
    pub sheets: Arc<dyn SheetSource>,
    pub tokens: JwtCodec,
    pub hasher: Argon2Hasher,
    pub admin: AdminCredentials,
    // Fallback settings when the settings workflow is unavailable.
    pub default_settings: Settings,
    pub secure_cookies: bool,
    pub failed_login_delay: Duration,
    pub environment: String,
}

// System clock adapter used by the use cases.
#[derive(Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
