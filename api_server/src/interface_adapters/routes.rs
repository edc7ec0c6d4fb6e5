use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

use crate::interface_adapters::handlers::{admin, auth, leads, payments, settings, webinar};
use crate::interface_adapters::protocol::ErrorResponse;
use crate::interface_adapters::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/capture-lead", post(leads::capture_lead))
        .route("/contact", post(leads::contact))
        .route("/ai-chat", post(leads::ai_chat))
        .route("/simulate-payment", post(payments::simulate_payment))
        .route("/validate-coupon", post(payments::validate_coupon))
        .route("/webinar-info", get(webinar::webinar_info))
        .route("/health", get(webinar::health))
        .route("/admin/login", post(admin::login))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/refresh-token", post(admin::refresh_token))
        .route("/admin/analytics", get(admin::analytics))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/verify", get(auth::verify))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/admin-config", get(settings::get_settings))
        .route(
            "/settings",
            get(settings::get_settings).post(settings::update_settings),
        )
        .method_not_allowed_fallback(method_not_allowed);

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    envelope(StatusCode::NOT_FOUND, "Route not found")
}

async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    envelope(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

fn envelope(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            success: false,
            message: message.to_string(),
            details: None,
            error: None,
        }),
    )
}
