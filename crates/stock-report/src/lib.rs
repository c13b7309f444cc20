//! Stock report generation
//!
//! This crate collects up to three ticker symbols, fetches recent daily bars
//! for them from Polygon, and asks a completion model to turn that data into
//! a Markdown stock report. It includes:
//!
//! - Page state for collecting tickers and fetching market data in parallel
//! - A report service that builds the prompt and calls the completion provider
//! - An HTTP API (`POST /api/report`) wrapping the report service
//! - Clients for the market data provider and for a running report server
//!
//! # Architecture
//!
//! The `report-server` binary owns one process-scoped [`ReportService`]
//! (holding the completion provider) and injects it into the axum router.
//! The `stock-report` binary drives a [`ReportPage`] from the terminal and
//! talks to the server through [`ReportClient`].
//!
//! # Example
//!
//! ```no_run
//! use report_llm::providers::OpenAIProvider;
//! use stock_report::{ReportConfig, ReportGenerator, ReportService};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ReportConfig::builder().with_env().build()?;
//!     let provider = Arc::new(OpenAIProvider::new(config.require_openai_key()?)?);
//!     let service = ReportService::new(provider, config.completion.clone())?;
//!
//!     let report = service.generate_report("AAPL,189.3\nMSFT,402.1").await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dates;
pub mod error;
pub mod page;
pub mod prompts;
pub mod report;
pub mod server;
pub mod tickers;

// Re-export main types for convenience
pub use api::{MarketDataSource, PolygonClient, ReportClient};
pub use config::{CompletionSettings, ReportConfig};
pub use dates::DateRange;
pub use error::{ReportError, Result};
pub use page::{Phase, ReportPage};
pub use report::{ReportGenerator, ReportService};
pub use tickers::{extract_tickers, ticker_list};
