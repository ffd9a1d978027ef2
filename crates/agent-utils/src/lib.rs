//! Shared utilities for think-once
//!
//! This crate provides the settings model every other crate reads at startup
//! and the tracing subscriber setup used by the binaries.

pub mod config;
pub mod logging;

pub use config::{
    AgentSettings, ConfigError, DataSettings, ExecutionMode, LlmSettings, PromptSettings,
    RouterKind, Settings,
};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
