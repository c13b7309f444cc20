//! Configuration for report generation and market data access

use crate::error::{ReportError, Result};
use report_utils::{env_or, optional_env};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_POLYGON_API_BASE: &str = "https://api.polygon.io";
const DEFAULT_SERVER_ADDR: &str = "127.0.0.1:3000";

/// Fixed sampling parameters sent with every report completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// Model identifier
    pub model: String,
    /// Token cap for the generated report
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Presence penalty
    pub presence_penalty: f32,
    /// Frequency penalty
    pub frequency_penalty: f32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 1500,
            temperature: 0.7,
            presence_penalty: 0.5,
            frequency_penalty: 0.5,
        }
    }
}

/// Configuration for the report server and the terminal front-end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Completion parameters
    pub completion: CompletionSettings,

    /// Completion API key (server-side secret)
    pub openai_api_key: Option<String>,

    /// Completion API base URL
    pub openai_api_base: String,

    /// Timeout for a single completion call
    pub completion_timeout: Duration,

    /// Market data API key
    pub polygon_api_key: Option<String>,

    /// Market data API base URL
    pub polygon_api_base: String,

    /// Timeout for a single market data request
    pub request_timeout: Duration,

    /// Number of days covered by the market data window
    pub lookback_days: u32,

    /// Address the report server binds to
    pub server_addr: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            completion: CompletionSettings::default(),
            openai_api_key: None,
            openai_api_base: DEFAULT_OPENAI_API_BASE.to_string(),
            completion_timeout: Duration::from_secs(120),
            polygon_api_key: None,
            polygon_api_base: DEFAULT_POLYGON_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            lookback_days: 3,
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
        }
    }
}

impl ReportConfig {
    /// Create a new configuration builder
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let c = &self.completion;

        if c.model.trim().is_empty() {
            return Err(ReportError::ConfigError("model must not be empty".to_string()));
        }

        if c.max_tokens == 0 {
            return Err(ReportError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(ReportError::ConfigError(format!(
                "temperature must be within [0, 2], got {}",
                c.temperature
            )));
        }

        for (name, value) in [
            ("presence_penalty", c.presence_penalty),
            ("frequency_penalty", c.frequency_penalty),
        ] {
            if !(-2.0..=2.0).contains(&value) {
                return Err(ReportError::ConfigError(format!(
                    "{name} must be within [-2, 2], got {value}"
                )));
            }
        }

        if self.lookback_days == 0 {
            return Err(ReportError::ConfigError(
                "lookback_days must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Completion API key, or a configuration error naming the variable
    pub fn require_openai_key(&self) -> Result<&str> {
        self.openai_api_key.as_deref().ok_or_else(|| {
            ReportError::ConfigError("OPENAI_API_KEY environment variable not set".to_string())
        })
    }

    /// Market data API key, or a configuration error naming the variable
    pub fn require_polygon_key(&self) -> Result<&str> {
        self.polygon_api_key.as_deref().ok_or_else(|| {
            ReportError::ConfigError("POLYGON_API_KEY environment variable not set".to_string())
        })
    }
}

/// Builder for ReportConfig
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    model: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    presence_penalty: Option<f32>,
    frequency_penalty: Option<f32>,
    openai_api_key: Option<String>,
    openai_api_base: Option<String>,
    completion_timeout: Option<Duration>,
    polygon_api_key: Option<String>,
    polygon_api_base: Option<String>,
    request_timeout: Option<Duration>,
    lookback_days: Option<u32>,
    server_addr: Option<String>,
}

impl ReportConfigBuilder {
    /// Set the completion model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the token cap
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the presence penalty
    pub fn presence_penalty(mut self, penalty: f32) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    /// Set the frequency penalty
    pub fn frequency_penalty(mut self, penalty: f32) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    /// Set the completion API key
    pub fn openai_api_key(mut self, key: impl Into<String>) -> Self {
        self.openai_api_key = Some(key.into());
        self
    }

    /// Set the completion API base URL
    pub fn openai_api_base(mut self, base: impl Into<String>) -> Self {
        self.openai_api_base = Some(base.into());
        self
    }

    /// Set the completion timeout
    pub fn completion_timeout(mut self, duration: Duration) -> Self {
        self.completion_timeout = Some(duration);
        self
    }

    /// Set the market data API key
    pub fn polygon_api_key(mut self, key: impl Into<String>) -> Self {
        self.polygon_api_key = Some(key.into());
        self
    }

    /// Set the market data API base URL
    pub fn polygon_api_base(mut self, base: impl Into<String>) -> Self {
        self.polygon_api_base = Some(base.into());
        self
    }

    /// Set the market data request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the market data window length in days
    pub fn lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = Some(days);
        self
    }

    /// Set the server bind address
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.server_addr = Some(addr.into());
        self
    }

    /// Load keys, endpoints and the model override from the environment
    ///
    /// Values already set on the builder win over the environment.
    pub fn with_env(mut self) -> Self {
        self.openai_api_key = self.openai_api_key.or_else(|| optional_env("OPENAI_API_KEY"));
        self.openai_api_base = self
            .openai_api_base
            .or_else(|| Some(env_or("OPENAI_API_BASE", DEFAULT_OPENAI_API_BASE)));
        self.model = self.model.or_else(|| optional_env("OPENAI_MODEL"));
        self.polygon_api_key = self.polygon_api_key.or_else(|| optional_env("POLYGON_API_KEY"));
        self.polygon_api_base = self
            .polygon_api_base
            .or_else(|| Some(env_or("POLYGON_API_BASE", DEFAULT_POLYGON_API_BASE)));
        self.server_addr = self
            .server_addr
            .or_else(|| Some(env_or("REPORT_SERVER_ADDR", DEFAULT_SERVER_ADDR)));
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<ReportConfig> {
        let defaults = ReportConfig::default();
        let dc = defaults.completion;

        let config = ReportConfig {
            completion: CompletionSettings {
                model: self.model.unwrap_or(dc.model),
                max_tokens: self.max_tokens.unwrap_or(dc.max_tokens),
                temperature: self.temperature.unwrap_or(dc.temperature),
                presence_penalty: self.presence_penalty.unwrap_or(dc.presence_penalty),
                frequency_penalty: self.frequency_penalty.unwrap_or(dc.frequency_penalty),
            },
            openai_api_key: self.openai_api_key,
            openai_api_base: self.openai_api_base.unwrap_or(defaults.openai_api_base),
            completion_timeout: self.completion_timeout.unwrap_or(defaults.completion_timeout),
            polygon_api_key: self.polygon_api_key,
            polygon_api_base: self.polygon_api_base.unwrap_or(defaults.polygon_api_base),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            lookback_days: self.lookback_days.unwrap_or(defaults.lookback_days),
            server_addr: self.server_addr.unwrap_or(defaults.server_addr),
        };

        config.validate()?;
        Ok(config)
    }
}
