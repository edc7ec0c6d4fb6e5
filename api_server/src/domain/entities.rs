use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::claims::Role;

// Client metadata captured from request headers.
#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub ip: String,
    pub user_agent: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            ip: "unknown".to_string(),
            user_agent: "unknown".to_string(),
        }
    }
}

// Prospective registrant forwarded to the lead workflow.
#[derive(Debug, Clone, Serialize)]
pub struct Lead {
    pub lead_id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub message: String,
    pub session_id: Option<String>,
    pub email: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Success,
    Failed,
    NeedTimeToConfirm,
}

impl PaymentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "success" => Some(Self::Success),
            "failed" => Some(Self::Failed),
            "need_time_to_confirm" => Some(Self::NeedTimeToConfirm),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::NeedTimeToConfirm => "need_time_to_confirm",
        }
    }
}

// Simulated payment forwarded to the payment workflow. Never persisted here.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSimulation {
    pub email: String,
    pub status: PaymentStatus,
    pub transaction_id: String,
    pub amount: f64,
    pub coupon_code: Option<String>,
    pub discount_amount: Option<f64>,
    pub original_amount: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CouponCheck {
    pub code: String,
    pub email: Option<String>,
    pub amount: Option<f64>,
}

// Public identity of an end user, as embedded in tokens and responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

// User record returned by the user workflow.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub profile: UserProfile,
    pub password_hash: Option<String>,
}

/// Site configuration shown by the frontend.
///
/// The workflow owns the real values; `Default` holds the fallback used when
/// it cannot be reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    pub price: f64,
    pub original_price: f64,
    pub currency: String,
    pub webinar_date: String,
    pub webinar_time: String,
    pub registration_deadline: String,
    pub seats_total: u32,
    pub whatsapp_link: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub instagram_url: String,
    pub youtube_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            price: 499.0,
            original_price: 2999.0,
            currency: "INR".to_string(),
            webinar_date: "Next Monday".to_string(),
            webinar_time: "7:00 PM IST".to_string(),
            registration_deadline: "Sunday 11:59 PM IST".to_string(),
            seats_total: 100,
            whatsapp_link: "https://chat.whatsapp.com/".to_string(),
            contact_email: "support@pyfullstack.dev".to_string(),
            contact_phone: "+91 90000 00000".to_string(),
            instagram_url: "https://www.instagram.com/".to_string(),
            youtube_url: "https://www.youtube.com/".to_string(),
        }
    }
}

// Partial settings, used for upstream payloads, admin updates and the defaults file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webinar_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webinar_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats_total: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_url: Option<String>,
}

impl Settings {
    // Overlay every field present in the patch.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(value) = patch.price {
            self.price = value;
        }
        if let Some(value) = patch.original_price {
            self.original_price = value;
        }
        if let Some(value) = patch.currency {
            self.currency = value;
        }
        if let Some(value) = patch.webinar_date {
            self.webinar_date = value;
        }
        if let Some(value) = patch.webinar_time {
            self.webinar_time = value;
        }
        if let Some(value) = patch.registration_deadline {
            self.registration_deadline = value;
        }
        if let Some(value) = patch.seats_total {
            self.seats_total = value;
        }
        if let Some(value) = patch.whatsapp_link {
            self.whatsapp_link = value;
        }
        if let Some(value) = patch.contact_email {
            self.contact_email = value;
        }
        if let Some(value) = patch.contact_phone {
            self.contact_phone = value;
        }
        if let Some(value) = patch.instagram_url {
            self.instagram_url = value;
        }
        if let Some(value) = patch.youtube_url {
            self.youtube_url = value;
        }
    }

    pub fn merged(mut self, patch: SettingsPatch) -> Self {
        self.apply(patch);
        self
    }
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_patch_sets_some_fields_then_only_those_fields_change() {
        let merged = Settings::default().merged(SettingsPatch {
            price: Some(799.0),
            contact_email: Some("team@pyfullstack.dev".to_string()),
            ..Default::default()
        });

        assert_eq!(merged.price, 799.0);
        assert_eq!(merged.contact_email, "team@pyfullstack.dev");
        assert_eq!(merged.currency, Settings::default().currency);
        assert_eq!(merged.seats_total, 100);
    }

    #[test]
    fn when_payment_status_is_unknown_then_parse_returns_none() {
        assert_eq!(
            PaymentStatus::parse("need_time_to_confirm"),
            Some(PaymentStatus::NeedTimeToConfirm)
        );
        assert_eq!(PaymentStatus::parse("pending"), None);
        assert_eq!(PaymentStatus::Failed.as_str(), "failed");
    }
}
