//! Page state for collecting tickers and showing a report
//!
//! [`ReportPage`] holds everything one user session sees: the ticker input,
//! the collected tickers, a loading flag, the report text and a validation
//! flag. The visible [`Phase`] is derived from those flags on demand.

use crate::api::MarketDataSource;
use crate::dates::DateRange;
use crate::report::ReportGenerator;
use futures::future::try_join_all;
use tracing::{error, info, warn};

/// Maximum number of tickers a page collects
pub const MAX_TICKERS: usize = 3;

/// Inputs must be longer than this after trimming
pub const MIN_TICKER_EXCLUSIVE: usize = 2;

/// Report text shown when any market data request fails
pub const FETCH_ERROR: &str = "Error fetching data.";

/// Report text shown when the narrative report could not be generated
pub const NARRATE_ERROR: &str = "Error generating report.";

/// What the page is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ticker form
    Input,
    /// Requests in flight
    Loading,
    /// Report text
    Result,
}

/// Local UI state of the report page
#[derive(Debug, Clone, Default)]
pub struct ReportPage {
    input: String,
    tickers: Vec<String>,
    loading: bool,
    report: Option<String>,
    label_error: bool,
    // set only while the report holds freshly fetched market data
    has_market_data: bool,
}

impl ReportPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tickers(&self) -> &[String] {
        &self.tickers
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    pub fn label_error(&self) -> bool {
        self.label_error
    }

    /// Replace the contents of the ticker input
    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Add the current input as a ticker
    ///
    /// Accepts when the trimmed input is longer than two characters and
    /// fewer than three tickers are present: the uppercased value is
    /// appended, the input cleared and the error flag reset. Otherwise only
    /// the error flag is set.
    pub fn add_ticker(&mut self) -> bool {
        let value = self.input.trim();
        if value.chars().count() > MIN_TICKER_EXCLUSIVE && self.tickers.len() < MAX_TICKERS {
            self.tickers.push(value.to_uppercase());
            self.input.clear();
            self.label_error = false;
            true
        } else {
            warn!(input = %self.input, count = self.tickers.len(), "Rejected ticker input");
            self.label_error = true;
            false
        }
    }

    /// Whether the generate action is enabled
    pub fn can_generate(&self) -> bool {
        !self.tickers.is_empty() && !self.loading
    }

    /// Fetch market data for every ticker in parallel
    ///
    /// All requests must succeed; the raw bodies are joined with newlines in
    /// ticker order. Any failure replaces the whole report with
    /// [`FETCH_ERROR`]. Loading always ends `false`.
    pub async fn generate(&mut self, source: &dyn MarketDataSource, range: &DateRange) {
        if !self.can_generate() {
            return;
        }

        self.loading = true;
        info!(tickers = ?self.tickers, range = %range, "Querying market data");

        let fetches = self
            .tickers
            .iter()
            .map(|ticker| source.fetch_aggregates(ticker, range));

        match try_join_all(fetches).await {
            Ok(bodies) => {
                self.report = Some(bodies.join("\n"));
                self.has_market_data = true;
            }
            Err(e) => {
                error!("Market data request failed: {}", e);
                self.report = Some(FETCH_ERROR.to_string());
                self.has_market_data = false;
            }
        }

        self.loading = false;
    }

    /// Replace fetched market data with a generated narrative report
    ///
    /// Does nothing unless the report currently holds market data from a
    /// successful [`generate`](Self::generate).
    pub async fn narrate(&mut self, generator: &dyn ReportGenerator) {
        let data = match (&self.report, self.has_market_data) {
            (Some(data), true) if !self.loading => data.clone(),
            _ => {
                warn!("No market data to narrate");
                return;
            }
        };

        self.loading = true;
        self.has_market_data = false;

        match generator.generate_report(&data).await {
            Ok(text) => self.report = Some(text),
            Err(e) => {
                error!("Report generation failed: {}", e);
                self.report = Some(NARRATE_ERROR.to_string());
            }
        }

        self.loading = false;
    }

    /// Discard tickers, report and validation state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Phase derived from the current flags
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.report.as_deref().is_some_and(|r| !r.is_empty()) {
            Phase::Result
        } else {
            Phase::Input
        }
    }
}
