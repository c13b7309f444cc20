//! Date window for market data requests

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar range passed to the aggregates endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Window of `lookback_days` ending the day before `today`
    ///
    /// Yesterday is the most recent day with complete daily bars.
    pub fn ending_before(today: NaiveDate, lookback_days: u32) -> Self {
        let end = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        let start = end
            .checked_sub_days(Days::new(u64::from(lookback_days)))
            .unwrap_or(end);
        Self { start, end }
    }

    /// Window ending yesterday in local time
    pub fn recent(lookback_days: u32) -> Self {
        Self::ending_before(Local::now().date_naive(), lookback_days)
    }

    /// Start date as `YYYY-MM-DD`
    pub fn start_param(&self) -> String {
        self.start.format(DATE_FORMAT).to_string()
    }

    /// End date as `YYYY-MM-DD`
    pub fn end_param(&self) -> String {
        self.end.format(DATE_FORMAT).to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_param(), self.end_param())
    }
}
