// Framework bootstrap for the API server runtime.

use crate::domain::Webhook;
use crate::frameworks::config::{self, ServerConfig};
use crate::interface_adapters::clients::{SheetsClient, WorkflowClient};
use crate::interface_adapters::errors::expose_internal_details;
use crate::interface_adapters::routes::app;
use crate::interface_adapters::security::{Argon2Hasher, JwtCodec};
use crate::interface_adapters::state::AppState;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use std::net::SocketAddr;
use std::{io::Result, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let config = ServerConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::io::Error::other(e)
    })?;
    serve(listener, config).await
}

pub async fn serve(listener: tokio::net::TcpListener, config: ServerConfig) -> Result<()> {
    let address = listener.local_addr()?;
    let cors = cors_layer(config.frontend_url.as_deref());
    // build state
    let state = build_state(config)?;
    let app = app(state).layer(cors);

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "server error");
        })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([0, 0, 0, 0], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state(config: ServerConfig) -> Result<Arc<AppState>> {
    let mut workflow = WorkflowClient::new(config.api_base_url.clone(), config.webhook_timeout)
        .map_err(|e| std::io::Error::other(format!("failed to initialize workflow client: {e}")))?;
    if let Some(url) = config.get_settings_webhook.clone() {
        workflow = workflow.with_override(Webhook::GetSettings, url);
    }
    if let Some(url) = config.update_settings_webhook.clone() {
        workflow = workflow.with_override(Webhook::UpdateSettings, url);
    }
    tracing::debug!(
        api_base_url = %config.api_base_url,
        webhook_timeout_ms = config.webhook_timeout.as_millis(),
        "workflow client configured"
    );

    if config.sheets_csv_url.is_none() {
        tracing::warn!("SHEETS_CSV_URL not set; admin analytics will be unavailable");
    }
    let sheets = SheetsClient::new(config.sheets_csv_url.clone(), config::SHEETS_FETCH_TIMEOUT)
        .map_err(|e| std::io::Error::other(format!("failed to initialize sheets client: {e}")))?;

    expose_internal_details(!config.is_production());

    if !config.admin.is_configured() {
        tracing::warn!("ADMIN_PASSWORD not set; admin login is disabled");
    }

    Ok(Arc::new(AppState {
        gateway: Arc::new(workflow),
        sheets: Arc::new(sheets),
        tokens: JwtCodec::new(config.jwt_secret.as_bytes()),
        hasher: Argon2Hasher,
        secure_cookies: config.is_production(),
        admin: config.admin,
        default_settings: config.default_settings,
        failed_login_delay: config.failed_login_delay,
        environment: config.environment,
    }))
}

// Only the configured frontend may call the API with credentials.
fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "FRONTEND_URL is not a valid origin; using localhost");
            AllowOrigin::exact(HeaderValue::from_static("http://localhost:5173"))
        }
        None => AllowOrigin::exact(HeaderValue::from_static("http://localhost:5173")),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(60 * 60))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
