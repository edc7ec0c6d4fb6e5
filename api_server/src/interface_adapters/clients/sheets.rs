use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::domain::{GatewayError, SheetSource};

// Fetches the published CSV export of the leads spreadsheet.
#[derive(Clone)]
pub struct SheetsClient {
    http: Client,
    csv_url: Option<Url>,
}

impl SheetsClient {
    pub fn new(csv_url: Option<Url>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, csv_url })
    }
}

#[async_trait]
impl SheetSource for SheetsClient {
    async fn fetch_csv(&self) -> Result<String, GatewayError> {
        let Some(url) = self.csv_url.clone() else {
            return Err(GatewayError::Unavailable(
                "SHEETS_CSV_URL is not configured".to_string(),
            ));
        };

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| GatewayError::Unavailable(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Unavailable(format!("sheet export answered {status}")));
        }

        response
            .text()
            .await
            .map_err(|err| GatewayError::Unavailable(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn when_url_is_not_configured_then_sheet_is_unavailable() {
        let client = SheetsClient::new(None, Duration::from_secs(1)).expect("client");

        let result = client.fetch_csv().await;

        assert!(matches!(result, Err(GatewayError::Unavailable(_))));
    }

    #[tokio::test]
    async fn when_sheet_is_published_then_csv_text_is_returned() {
        let app = axum::Router::new().route(
            "/export",
            axum::routing::get(|| async { "timestamp,email\n2026-03-01,a@b.co\n" }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub port");
        let addr = listener.local_addr().expect("stub addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        let url = Url::parse(&format!("http://{addr}/export")).expect("stub url");
        let client = SheetsClient::new(Some(url), Duration::from_secs(2)).expect("client");

        let csv_text = client.fetch_csv().await.expect("expected csv");

        assert!(csv_text.starts_with("timestamp,email"));
    }
}
