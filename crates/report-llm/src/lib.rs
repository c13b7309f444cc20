//! Completion provider abstraction layer for stock-report
//!
//! This crate provides provider-agnostic types for asking a hosted language
//! model to complete a chat prompt. It includes:
//!
//! - Message types for chat prompts
//! - Completion request/response types with sampling parameters
//! - Provider trait for completion services
//! - An OpenAI-compatible chat completions provider

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
