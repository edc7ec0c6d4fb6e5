use std::sync::OnceLock;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::domain::{
    AnalyticsError, AuthError, FieldError, GatewayError, PaymentError, SettingsError,
    ValidationError,
};
use crate::interface_adapters::protocol::ErrorResponse;

// Single mapping from every failure to an HTTP status and the shared error envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("malformed JSON payload: {0}")]
    MalformedJson(String),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("admin access required")]
    Forbidden,
    #[error("{0}")]
    Conflict(&'static str),
    // Upstream 4xx passed through with a generic message.
    #[error("upstream rejected the request with status {0}")]
    Rejected(StatusCode),
    #[error("{0}")]
    BadGateway(&'static str),
    #[error("{0}")]
    Unavailable(&'static str),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Rejected(status) => *status,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Validation(_) => "Validation failed".to_string(),
            ApiError::MalformedJson(_) => "Malformed JSON payload".to_string(),
            ApiError::Unauthorized(message)
            | ApiError::Conflict(message)
            | ApiError::BadGateway(message)
            | ApiError::Unavailable(message) => (*message).to_string(),
            ApiError::Forbidden => "Admin access required".to_string(),
            ApiError::Rejected(_) => "The request could not be processed".to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

// Set once at startup. Unset means internal details stay out of responses.
static EXPOSE_INTERNAL_DETAILS: OnceLock<bool> = OnceLock::new();

pub fn expose_internal_details(enabled: bool) {
    if EXPOSE_INTERNAL_DETAILS.set(enabled).is_err() {
        tracing::debug!("internal error exposure already decided");
    }
}

impl ApiError {
    fn render(self, expose_details: bool) -> Response {
        let status = self.status();
        let message = self.message();
        let error = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "internal error");
                expose_details.then(|| detail.clone())
            }
            ApiError::MalformedJson(detail) => {
                tracing::debug!(error = %detail, "rejected malformed body");
                None
            }
            _ => None,
        };
        let details = match self {
            ApiError::Validation(details) => Some(details),
            _ => None,
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                message,
                details,
                error,
            }),
        )
            .into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let expose = EXPOSE_INTERNAL_DETAILS.get().copied().unwrap_or(false);
        self.render(expose)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.details)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Invalid(err) => err.into(),
            AuthError::MissingToken => ApiError::Unauthorized("Access denied. No token provided."),
            AuthError::TokenExpired => ApiError::Unauthorized("Token expired"),
            AuthError::InvalidToken => ApiError::Unauthorized("Invalid token"),
            AuthError::Forbidden => ApiError::Forbidden,
            AuthError::InvalidCredentials => ApiError::Unauthorized("Invalid credentials"),
            AuthError::EmailTaken => ApiError::Conflict("An account with this email already exists"),
            AuthError::UnexpectedShape(detail) => {
                tracing::warn!(error = %detail, "user workflow reply had an unknown shape");
                ApiError::BadGateway("Unexpected response from user service")
            }
            AuthError::Upstream(err) => err.into(),
            AuthError::Hashing(detail) | AuthError::Signing(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rejected { status, message } => {
                tracing::warn!(status, upstream_message = ?message, "workflow rejected the request");
                ApiError::Rejected(upstream_status(status))
            }
            GatewayError::Unavailable(detail) => {
                tracing::warn!(error = %detail, "workflow unavailable");
                ApiError::Unavailable("Service is temporarily unavailable. Please try again later.")
            }
            GatewayError::Decode(detail) => {
                tracing::warn!(error = %detail, "workflow reply could not be decoded");
                ApiError::BadGateway("Unexpected response from upstream service")
            }
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::Invalid(err) => err.into(),
            PaymentError::Rejected { status } => ApiError::Rejected(upstream_status(status)),
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Invalid(err) => err.into(),
            SettingsError::Upstream(GatewayError::Unavailable(detail)) => {
                tracing::warn!(error = %detail, "settings workflow unavailable");
                ApiError::Unavailable("Settings service is temporarily unavailable")
            }
            SettingsError::Upstream(err) => err.into(),
        }
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::Upstream(err) => {
                tracing::warn!(error = %err, "analytics sheet unavailable");
                ApiError::Unavailable("Analytics data is temporarily unavailable")
            }
            AnalyticsError::Malformed(detail) => {
                tracing::warn!(error = %detail, "analytics sheet is malformed");
                ApiError::BadGateway("Analytics data could not be read")
            }
        }
    }
}

// Only 4xx statuses are passed through; anything else is reported as a bad gateway.
fn upstream_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(StatusCode::is_client_error)
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("expected response body");
        (status, serde_json::from_slice(&body).expect("expected json body"))
    }

    #[tokio::test]
    async fn when_validation_fails_then_details_are_listed() {
        let err: ApiError = ValidationError::single("name", "Name is required").into();

        let (status, payload) = body_of(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(payload["success"], false);
        assert_eq!(payload["details"][0]["field"], "name");
    }

    #[tokio::test]
    async fn when_token_is_expired_then_returns_401_token_expired() {
        let (status, payload) = body_of(AuthError::TokenExpired.into()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(payload["message"], "Token expired");
    }

    #[tokio::test]
    async fn when_upstream_rejects_then_status_is_passed_through_with_generic_message() {
        let err: ApiError = GatewayError::Rejected {
            status: 422,
            message: Some("row 17 has a bad amount".to_string()),
        }
        .into();

        let (status, payload) = body_of(err).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(payload["message"], "The request could not be processed");
    }

    async fn rendered(err: ApiError, expose_details: bool) -> Value {
        let response = err.render(expose_details);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("expected response body");
        serde_json::from_slice(&body).expect("expected json body")
    }

    #[tokio::test]
    async fn when_internal_error_occurs_then_message_is_generic() {
        let (status, payload) = body_of(ApiError::Internal("key missing".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(payload["message"], "Internal server error");
    }

    #[tokio::test]
    async fn when_details_are_exposed_then_only_internal_errors_carry_them() {
        let exposed = rendered(ApiError::Internal("key missing".to_string()), true).await;
        let hidden = rendered(ApiError::Internal("key missing".to_string()), false).await;
        let malformed = rendered(ApiError::MalformedJson("eof".to_string()), true).await;

        assert_eq!(exposed["error"], "key missing");
        assert!(hidden.get("error").is_none());
        assert!(malformed.get("error").is_none());
    }

    #[test]
    fn when_upstream_status_is_not_a_client_error_then_it_becomes_bad_gateway() {
        assert_eq!(upstream_status(409), StatusCode::CONFLICT);
        assert_eq!(upstream_status(302), StatusCode::BAD_GATEWAY);
        assert_eq!(upstream_status(999), StatusCode::BAD_GATEWAY);
    }
}
