// Wire protocol DTOs for the public /api surface.
// Request fields are optional so missing values surface as validation details, not 422s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Claims, FieldError, Role, Settings, UserProfile};
use crate::use_cases::admin::DashboardStats;
use crate::use_cases::analytics::DashboardMetrics;
use crate::use_cases::webinar_info::WebinarInfo;

#[derive(Debug, Default, Deserialize)]
pub struct CaptureLeadRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CaptureLeadResponse {
    pub success: bool,
    pub message: String,
    pub lead_id: String,
    pub forwarded: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub forwarded: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct AiChatRequest {
    pub message: Option<String>,
    #[serde(alias = "sessionId")]
    pub session_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Ai,
    Fallback,
}

#[derive(Debug, Serialize)]
pub struct AiChatResponse {
    pub success: bool,
    pub reply: String,
    pub source: ReplySource,
}

#[derive(Debug, Default, Deserialize)]
pub struct SimulatePaymentRequest {
    pub email: Option<String>,
    pub status: Option<String>,
    pub amount: Option<f64>,
    pub transaction_id: Option<String>,
    pub coupon_code: Option<String>,
    pub discount_amount: Option<f64>,
    pub original_amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SimulatePaymentResponse {
    pub success: bool,
    pub status: String,
    pub transaction_id: String,
    pub confirmation_pending: bool,
    pub recorded: bool,
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ValidateCouponRequest {
    #[serde(alias = "coupon_code", alias = "couponCode")]
    pub code: Option<String>,
    pub email: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ValidateCouponResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_amount: Option<f64>,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct WebinarInfoResponse {
    pub success: bool,
    #[serde(flatten)]
    pub info: WebinarInfo,
}

#[derive(Debug, Default, Deserialize)]
pub struct AdminLoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AdminUser {
    pub username: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_in: i64,
    pub user: AdminUser,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboardResponse {
    pub success: bool,
    pub stats: DashboardStats,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub metrics: DashboardMetrics,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "rememberMe", alias = "remember_me")]
    pub remember_me: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "rememberMe", alias = "remember_me")]
    pub remember_me: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

// Identity echoed back from verified claims.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub remember_me: bool,
    pub expires_at: i64,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.email,
            username: claims.username,
            name: claims.name,
            role: claims.role,
            user_id: claims.user_id,
            remember_me: claims.remember_me,
            expires_at: claims.exp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsSource {
    Workflow,
    Defaults,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub success: bool,
    pub settings: Settings,
    pub source: SettingsSource,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: &'static str,
    pub environment: String,
    pub timestamp: DateTime<Utc>,
}

// Error envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
