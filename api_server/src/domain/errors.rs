use serde::Serialize;
use thiserror::Error;

// Outcome of a failed call to an external workflow.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    // Transport failure, timeout or upstream 5xx.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),
    // Upstream answered with a 4xx status.
    #[error("upstream rejected request with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("upstream response could not be decoded: {0}")]
    Decode(String),
}

// One invalid request field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
#[error("validation failed")]
pub struct ValidationError {
    pub details: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: &str, message: &str) -> Self {
        Self {
            details: vec![FieldError {
                field: field.to_string(),
                message: message.to_string(),
            }],
        }
    }

    pub fn names(&self, field: &str) -> bool {
        self.details.iter().any(|detail| detail.field == field)
    }
}

// Domain-level errors for admin and user auth workflows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("no token provided")]
    MissingToken,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid token")]
    InvalidToken,
    #[error("admin access required")]
    Forbidden,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already registered")]
    EmailTaken,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token signing failed: {0}")]
    Signing(String),
    #[error("unexpected user service response: {0}")]
    UnexpectedShape(String),
    #[error(transparent)]
    Upstream(#[from] GatewayError),
}

// Errors raised by payment simulation.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("payment workflow rejected the request with status {status}")]
    Rejected { status: u16 },
}

// Errors raised when updating site settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Upstream(#[from] GatewayError),
}

// Errors raised while building analytics from the sheet export.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Upstream(#[from] GatewayError),
    #[error("sheet export is not valid CSV: {0}")]
    Malformed(String),
}
