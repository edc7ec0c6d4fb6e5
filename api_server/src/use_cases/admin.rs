use std::time::Duration;

use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;

use crate::domain::validation::Validator;
use crate::domain::{AuthError, Claims, Clock, PasswordHasher, Settings, TokenCodec};
use crate::interface_adapters::protocol::AdminLoginRequest;

// Static admin credentials. The password may be plain text or an argon2 PHC hash.
#[derive(Clone)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl AdminCredentials {
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

// Response returned by the admin login use case.
#[derive(Debug)]
pub struct AdminSession {
    pub token: String,
    pub claims: Claims,
}

pub struct AdminLoginUseCase<'a, C, T: ?Sized, H: ?Sized> {
    pub clock: C,
    pub tokens: &'a T,
    pub hasher: &'a H,
    pub credentials: &'a AdminCredentials,
    // Slows down credential guessing.
    pub failure_delay: Duration,
}

impl<C, T, H> AdminLoginUseCase<'_, C, T, H>
where
    C: Clock,
    T: TokenCodec + ?Sized,
    H: PasswordHasher + ?Sized,
{
    pub async fn execute(&self, payload: AdminLoginRequest) -> Result<AdminSession, AuthError> {
        let mut validator = Validator::new();
        let username = validator.required_text("username", payload.username.as_deref(), 1, 100);
        let password = validator.required_secret("password", payload.password.as_deref(), 1, 200);
        validator.finish()?;
        let (username, password) = (username.unwrap_or_default(), password.unwrap_or_default());

        if !self.credentials.is_configured() {
            tracing::warn!("admin credentials are not configured; rejecting login");
        }

        let accepted = self.credentials.is_configured()
            && constant_time_eq(username.as_bytes(), self.credentials.username.as_bytes())
            && self.password_matches(&password).await;

        if !accepted {
            tokio::time::sleep(self.failure_delay).await;
            return Err(AuthError::InvalidCredentials);
        }

        let claims = Claims::admin(&username, self.clock.now());
        let token = self.tokens.issue(&claims)?;

        Ok(AdminSession { token, claims })
    }

    async fn password_matches(&self, plain: &str) -> bool {
        let stored = &self.credentials.password;
        if stored.starts_with("$argon2") {
            self.hasher.verify(plain, stored).await
        } else {
            constant_time_eq(plain.as_bytes(), stored.as_bytes())
        }
    }
}

// Length leaks, contents do not.
fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityItem {
    pub kind: &'static str,
    pub description: String,
    pub at: DateTime<Utc>,
}

/// Mock dashboard numbers. Deterministic for a given clock reading.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_leads: u32,
    pub leads_today: u32,
    pub successful_payments: u32,
    pub pending_payments: u32,
    pub failed_payments: u32,
    pub revenue: f64,
    pub currency: String,
    pub conversion_rate: f64,
    pub recent_activity: Vec<ActivityItem>,
    pub generated_at: DateTime<Utc>,
}

pub struct AdminDashboardUseCase<'a, C> {
    pub clock: C,
    pub settings: &'a Settings,
}

impl<C: Clock> AdminDashboardUseCase<'_, C> {
    pub fn execute(&self) -> DashboardStats {
        let now = self.clock.now();
        let day = now.ordinal();

        let total_leads = 1200 + day * 7;
        let successful_payments = total_leads * 18 / 100;
        let conversion_rate =
            (f64::from(successful_payments) / f64::from(total_leads) * 10_000.0).round() / 100.0;

        DashboardStats {
            total_leads,
            leads_today: 10 + (now.hour() * 3) % 25,
            successful_payments,
            pending_payments: 3 + day % 9,
            failed_payments: 5 + day % 13,
            revenue: f64::from(successful_payments) * self.settings.price,
            currency: self.settings.currency.clone(),
            conversion_rate,
            recent_activity: vec![
                ActivityItem {
                    kind: "lead",
                    description: "New lead captured from the landing page".to_string(),
                    at: now - chrono::Duration::minutes(5),
                },
                ActivityItem {
                    kind: "payment",
                    description: "Payment confirmed for the upcoming batch".to_string(),
                    at: now - chrono::Duration::minutes(22),
                },
                ActivityItem {
                    kind: "contact",
                    description: "Contact form message received".to_string(),
                    at: now - chrono::Duration::hours(1),
                },
            ],
            generated_at: now,
        }
    }
}
