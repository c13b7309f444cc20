//! Error types for stock report operations

use thiserror::Error;

/// Stock report specific errors
#[derive(Debug, Error)]
pub enum ReportError {
    /// Request body is not a JSON object with a non-empty `data` string
    #[error("Invalid request body")]
    InvalidBody,

    /// Request body could not be parsed at all
    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Completion provider failed
    #[error("Completion error: {0}")]
    Completion(#[from] report_llm::LLMError),

    /// Prompt template failed to render
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Market data provider answered with a non-success status
    #[error("Market data error for {ticker}: HTTP {status}")]
    MarketData { ticker: String, status: u16 },

    /// Report server answered with an error payload
    #[error("Report server error ({status}): {message}")]
    ReportServer { status: u16, message: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Listener or terminal IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ReportError {
    /// Whether the caller is at fault (as opposed to an upstream failure)
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReportError::InvalidBody)
    }
}

/// Result type alias for stock report operations
pub type Result<T> = std::result::Result<T, ReportError>;

impl From<minijinja::Error> for ReportError {
    fn from(err: minijinja::Error) -> Self {
        ReportError::Prompt(err.to_string())
    }
}
