//! Client for a running report server

use crate::error::{ReportError, Result};
use crate::report::ReportGenerator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Serialize)]
struct ReportRequest<'a> {
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct ReportBody {
    report: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Posts market data to `POST /api/report` on a report server
#[derive(Debug, Clone)]
pub struct ReportClient {
    client: Client,
    endpoint: String,
}

impl ReportClient {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:3000`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/report", base_url.trim_end_matches('/')),
        })
    }

    /// Full URL of the report endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ReportGenerator for ReportClient {
    #[instrument(skip(self, data), fields(endpoint = %self.endpoint))]
    async fn generate_report(&self, data: &str) -> Result<String> {
        debug!("Posting {} bytes of market data", data.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ReportRequest { data })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body: ReportBody = response.json().await?;
            return Ok(body.report);
        }

        let text = response.text().await?;
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error)
            .unwrap_or(text);
        Err(ReportError::ReportServer {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompletionSettings;
    use crate::report::ReportService;
    use crate::report::tests::{Reply, StubProvider};
    use crate::server::{self, GENERIC_ERROR};
    use axum::{Router, http::StatusCode, routing::post};
    use std::sync::Arc;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Serve the report router around a stubbed provider
    async fn spawn_report_server(reply: Reply) -> (ReportClient, Arc<StubProvider>) {
        let provider = StubProvider::new(reply);
        let service = ReportService::new(provider.clone(), CompletionSettings::default()).unwrap();
        let base = spawn(server::router(Arc::new(service))).await;
        let client = ReportClient::new(&base, Duration::from_secs(5)).unwrap();
        (client, provider)
    }

    #[test]
    fn test_endpoint() {
        let client = ReportClient::new("http://localhost:3000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:3000/api/report");
    }

    #[tokio::test]
    async fn test_decodes_report_body() {
        let (client, provider) = spawn_report_server(Reply::Text("# R")).await;

        let report = client.generate_report("AAPL,100\nMSFT,200").await.unwrap();
        assert_eq!(report, "# R");

        let requests = provider.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(
            requests[0].messages[1]
                .text()
                .unwrap()
                .contains("AAPL,100\nMSFT,200")
        );
    }

    #[tokio::test]
    async fn test_empty_completion_is_an_empty_report() {
        let (client, _) = spawn_report_server(Reply::NoChoices).await;
        assert_eq!(client.generate_report("AAPL,1").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_decodes_error_body() {
        let (client, _) = spawn_report_server(Reply::Fail).await;

        match client.generate_report("AAPL,1").await {
            Err(ReportError::ReportServer { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, GENERIC_ERROR);
            }
            other => panic!("Expected ReportServer error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_is_kept_verbatim() {
        let app = Router::new().route(
            "/api/report",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
        );
        let base = spawn(app).await;
        let client = ReportClient::new(&base, Duration::from_secs(5)).unwrap();

        match client.generate_report("AAPL,1").await {
            Err(ReportError::ReportServer { status, message }) => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("Expected ReportServer error, got {other:?}"),
        }
    }
}
