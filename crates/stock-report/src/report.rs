//! Report generation through a completion provider

use crate::config::CompletionSettings;
use crate::error::Result;
use crate::prompts::ReportPrompts;
use async_trait::async_trait;
use report_llm::{CompletionRequest, LLMError, LLMProvider};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Something that turns raw market data into a narrative report
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Generate Markdown for newline-delimited market data
    async fn generate_report(&self, data: &str) -> Result<String>;
}

/// Builds the report prompt and forwards it to a completion provider
///
/// Constructed once per process; the provider is injected rather than
/// created on demand.
pub struct ReportService {
    provider: Arc<dyn LLMProvider>,
    prompts: ReportPrompts,
    settings: CompletionSettings,
}

impl ReportService {
    /// Create a service around a shared provider
    pub fn new(provider: Arc<dyn LLMProvider>, settings: CompletionSettings) -> Result<Self> {
        Ok(Self {
            provider,
            prompts: ReportPrompts::new()?,
            settings,
        })
    }

    fn request_for(&self, data: &str) -> Result<CompletionRequest> {
        let s = &self.settings;
        Ok(CompletionRequest::builder(s.model.clone())
            .messages(self.prompts.messages(data)?)
            .max_tokens(s.max_tokens)
            .temperature(s.temperature)
            .presence_penalty(s.presence_penalty)
            .frequency_penalty(s.frequency_penalty)
            .build())
    }
}

#[async_trait]
impl ReportGenerator for ReportService {
    #[instrument(skip(self, data), fields(provider = self.provider.name(), bytes = data.len()))]
    async fn generate_report(&self, data: &str) -> Result<String> {
        let request = self.request_for(data)?;
        debug!("Requesting report from model {}", request.model);

        match self.provider.complete(request).await {
            Ok(response) => {
                info!(
                    tokens = response.usage.total(),
                    stop_reason = ?response.stop_reason,
                    "Report generated"
                );
                if response.message.text().is_none() {
                    warn!("Completion returned null content, reporting empty text");
                }
                Ok(response.text_or_empty().to_string())
            }
            Err(LLMError::EmptyCompletion) => {
                warn!("Completion returned no choices, reporting empty text");
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}
