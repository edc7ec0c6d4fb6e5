use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

use crate::domain::{GatewayError, Webhook, WorkflowGateway};

#[derive(Debug, Deserialize)]
struct UpstreamMessage {
    #[serde(default)]
    message: Option<String>,
}

// Thin reqwest client for the automation workflow webhooks.
#[derive(Clone)]
pub struct WorkflowClient {
    http: Client,
    base_url: Url,
    // Full URLs for webhooks that do not live under the base URL.
    overrides: HashMap<Webhook, Url>,
}

impl WorkflowClient {
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        // Url::join replaces the last segment unless the base ends with a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            overrides: HashMap::new(),
        })
    }

    pub fn with_override(mut self, webhook: Webhook, url: Url) -> Self {
        self.overrides.insert(webhook, url);
        self
    }

    pub fn url_for(&self, webhook: Webhook) -> Result<Url, GatewayError> {
        if let Some(url) = self.overrides.get(&webhook) {
            return Ok(url.clone());
        }
        self.base_url
            .join(webhook.path())
            .map_err(|err| GatewayError::Unavailable(format!("bad webhook url: {err}")))
    }

    async fn read(webhook: Webhook, response: Response) -> Result<Value, GatewayError> {
        let status = response.status();
        tracing::debug!(webhook = webhook.path(), %status, "workflow replied");

        // Keep upstream status/message so use cases can tell 404 from 409.
        if status.is_client_error() {
            let message = response
                .json::<UpstreamMessage>()
                .await
                .ok()
                .and_then(|payload| payload.message);
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(GatewayError::Unavailable(format!("workflow answered {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|err| GatewayError::Unavailable(err.to_string()))?;
        // Workflows with no "respond to webhook" node answer 200 with an empty body.
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|err| GatewayError::Decode(err.to_string()))
    }
}

fn transport_error(webhook: Webhook, err: reqwest::Error) -> GatewayError {
    tracing::debug!(webhook = webhook.path(), timeout = err.is_timeout(), error = %err, "workflow call failed");
    GatewayError::Unavailable(err.to_string())
}

#[async_trait]
impl WorkflowGateway for WorkflowClient {
    async fn post(&self, webhook: Webhook, payload: Value) -> Result<Value, GatewayError> {
        let url = self.url_for(webhook)?;
        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|err| transport_error(webhook, err))?;
        Self::read(webhook, response).await
    }

    async fn get(&self, webhook: Webhook) -> Result<Value, GatewayError> {
        let url = self.url_for(webhook)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| transport_error(webhook, err))?;
        Self::read(webhook, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::post;
    use serde_json::json;

    // Serve a stub workflow on an ephemeral port and return its base URL.
    async fn stub_workflow() -> Url {
        let app = Router::new()
            .route("/webhook/contact", post(|| async { axum::Json(json!({"ok": true})) }))
            .route("/webhook/capture-lead", post(|| async { "" }))
            .route(
                "/webhook/validate-coupon",
                post(|| async {
                    (
                        StatusCode::CONFLICT,
                        axum::Json(json!({"message": "already used"})),
                    )
                }),
            )
            .route(
                "/webhook/ai-chat",
                post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .route("/webhook/auth/login", post(|| async { "<html>" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub port");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Url::parse(&format!("http://{addr}/webhook")).expect("stub url")
    }

    fn client(base: Url) -> WorkflowClient {
        WorkflowClient::new(base, Duration::from_secs(2)).expect("client")
    }

    #[test]
    fn when_base_has_no_trailing_slash_then_paths_are_appended() {
        let base = Url::parse("https://n8n.example.com/webhook").unwrap();
        let client = client(base).with_override(
            Webhook::GetSettings,
            Url::parse("https://settings.example.com/hook").unwrap(),
        );

        assert_eq!(
            client.url_for(Webhook::AuthRegister).unwrap().as_str(),
            "https://n8n.example.com/webhook/auth/register"
        );
        assert_eq!(
            client.url_for(Webhook::GetSettings).unwrap().as_str(),
            "https://settings.example.com/hook"
        );
    }

    #[tokio::test]
    async fn when_workflow_answers_json_then_value_is_returned() {
        let client = client(stub_workflow().await);

        let value = client.post(Webhook::Contact, json!({})).await;

        assert_eq!(value.unwrap(), json!({"ok": true}));
    }

    #[tokio::test]
    async fn when_workflow_answers_empty_body_then_null_is_returned() {
        let client = client(stub_workflow().await);

        let value = client.post(Webhook::CaptureLead, json!({})).await;

        assert_eq!(value.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn when_workflow_answers_4xx_then_status_and_message_are_kept() {
        let client = client(stub_workflow().await);

        let err = client
            .post(Webhook::ValidateCoupon, json!({}))
            .await
            .unwrap_err();

        match err {
            GatewayError::Rejected { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message.as_deref(), Some("already used"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn when_workflow_answers_5xx_then_it_is_unavailable() {
        let client = client(stub_workflow().await);

        let err = client.post(Webhook::AiChat, json!({})).await.unwrap_err();

        assert!(matches!(err, GatewayError::Unavailable(_)));
    }

    #[tokio::test]
    async fn when_workflow_answers_non_json_then_it_is_a_decode_error() {
        let client = client(stub_workflow().await);

        let err = client.post(Webhook::AuthLogin, json!({})).await.unwrap_err();

        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn when_workflow_is_unreachable_then_it_is_unavailable() {
        let client = client(Url::parse("http://127.0.0.1:1/webhook").unwrap());

        let err = client.post(Webhook::Contact, json!({})).await.unwrap_err();

        assert!(matches!(err, GatewayError::Unavailable(_)));
    }
}
