//! Shared utilities for stock-report
//!
//! This crate provides common functionality used across the workspace:
//! tracing subscriber setup and environment-variable lookups.

pub mod env;
pub mod logging;

pub use env::{env_or, optional_env};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
