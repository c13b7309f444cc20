//! Concrete completion provider implementations
//!
//! This module contains implementations of the LLMProvider trait for
//! hosted completion services.

pub mod openai;

pub use openai::{OpenAIConfig, OpenAIProvider};
