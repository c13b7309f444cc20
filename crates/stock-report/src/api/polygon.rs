//! Polygon aggregates API client

use crate::dates::DateRange;
use crate::error::{ReportError, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument};

/// Source of raw per-ticker market data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Daily bars for `ticker` over `range`, as the provider's raw body text
    async fn fetch_aggregates(&self, ticker: &str, range: &DateRange) -> Result<String>;
}

/// Polygon aggregates API client
#[derive(Debug, Clone)]
pub struct PolygonClient {
    client: Client,
    api_base: Url,
    api_key: String,
}

impl PolygonClient {
    /// Create a client for `api_base` (e.g. `https://api.polygon.io`)
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let api_base: String = api_base.into();
        let api_base = Url::parse(api_base.trim_end_matches('/')).map_err(|e| {
            ReportError::ConfigError(format!("invalid market data base URL '{api_base}': {e}"))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(ReportError::ConfigError(format!(
                "market data base URL '{api_base}' cannot carry a path"
            )));
        }
        Ok(Self {
            client,
            api_base,
            api_key: api_key.into(),
        })
    }

    /// Aggregates URL with the ticker percent-encoded as a single path segment
    fn aggregates_url(&self, ticker: &str, range: &DateRange) -> Result<Url> {
        let start = range.start_param();
        let end = range.end_param();
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ReportError::ConfigError(format!(
                    "market data base URL '{}' cannot carry a path",
                    self.api_base
                ))
            })?
            .pop_if_empty()
            .extend([
                "v2",
                "aggs",
                "ticker",
                ticker,
                "range",
                "1",
                "day",
                start.as_str(),
                end.as_str(),
            ]);
        Ok(url)
    }
}

#[async_trait]
impl MarketDataSource for PolygonClient {
    #[instrument(skip(self, range), fields(range = %range))]
    async fn fetch_aggregates(&self, ticker: &str, range: &DateRange) -> Result<String> {
        let url = self.aggregates_url(ticker, range)?;
        debug!("Fetching aggregates from {}", url);

        let response = self
            .client
            .get(url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReportError::MarketData {
                ticker: ticker.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        extract::{Path, Query},
        http::StatusCode,
        routing::get,
    };
    use chrono::NaiveDate;
    use std::collections::HashMap;

    async fn aggregates(
        Path((ticker, start, end)): Path<(String, String, String)>,
        Query(query): Query<HashMap<String, String>>,
    ) -> (StatusCode, String) {
        if query.get("apiKey").map(String::as_str) != Some("secret") {
            return (StatusCode::UNAUTHORIZED, "bad key".to_string());
        }
        if ticker == "NOPE" {
            return (StatusCode::NOT_FOUND, "unknown".to_string());
        }
        (
            StatusCode::OK,
            format!(r#"{{"ticker":"{ticker}","from":"{start}","to":"{end}"}}"#),
        )
    }

    async fn spawn_polygon() -> String {
        let app = Router::new().route(
            "/v2/aggs/ticker/:ticker/range/1/day/:start/:end",
            get(aggregates),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn range() -> DateRange {
        DateRange::ending_before(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), 3)
    }

    #[test]
    fn test_aggregates_url() {
        let client =
            PolygonClient::new("https://api.polygon.io/", "k", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.aggregates_url("AAPL", &range()).unwrap().as_str(),
            "https://api.polygon.io/v2/aggs/ticker/AAPL/range/1/day/2024-03-11/2024-03-14"
        );
    }

    #[test]
    fn test_ticker_is_a_single_path_segment() {
        let client =
            PolygonClient::new("https://api.polygon.io", "k", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.aggregates_url("A/B", &range()).unwrap().as_str(),
            "https://api.polygon.io/v2/aggs/ticker/A%2FB/range/1/day/2024-03-11/2024-03-14"
        );
        assert_eq!(
            client.aggregates_url("X?Y", &range()).unwrap().as_str(),
            "https://api.polygon.io/v2/aggs/ticker/X%3FY/range/1/day/2024-03-11/2024-03-14"
        );
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = PolygonClient::new("not a url", "k", Duration::from_secs(5));
        assert!(matches!(result, Err(ReportError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_returns_raw_body() {
        let base = spawn_polygon().await;
        let client = PolygonClient::new(base, "secret", Duration::from_secs(5)).unwrap();

        let body = client.fetch_aggregates("MSFT", &range()).await.unwrap();
        assert_eq!(
            body,
            r#"{"ticker":"MSFT","from":"2024-03-11","to":"2024-03-14"}"#
        );
    }

    #[tokio::test]
    async fn test_reserved_characters_reach_the_ticker_route() {
        let base = spawn_polygon().await;
        let client = PolygonClient::new(base, "secret", Duration::from_secs(5)).unwrap();

        let body = client.fetch_aggregates("BRK/B", &range()).await.unwrap();
        assert_eq!(
            body,
            r#"{"ticker":"BRK/B","from":"2024-03-11","to":"2024-03-14"}"#
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let base = spawn_polygon().await;
        let client = PolygonClient::new(base.clone(), "secret", Duration::from_secs(5)).unwrap();
        let result = client.fetch_aggregates("NOPE", &range()).await;
        assert!(matches!(
            result,
            Err(ReportError::MarketData { status: 404, .. })
        ));

        let client = PolygonClient::new(base, "wrong", Duration::from_secs(5)).unwrap();
        let result = client.fetch_aggregates("AAPL", &range()).await;
        assert!(matches!(
            result,
            Err(ReportError::MarketData { status: 401, .. })
        ));
    }
}
