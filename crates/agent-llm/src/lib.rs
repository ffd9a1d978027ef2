//! Text-generation capability for think-once
//!
//! This crate provides the provider-agnostic pieces the analysis pipeline
//! uses to talk to a language model:
//!
//! - Message and completion types
//! - The [`LLMProvider`] trait and an OpenAI-compatible implementation
//! - [`TextGenerator`] for free-text and JSON-schema structured output
//! - Schema helpers for structured output

pub mod completion;
pub mod error;
pub mod generation;
pub mod messages;
pub mod provider;
pub mod providers;
pub mod schema;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, ResponseFormat, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use generation::{GenerationParams, TextGenerator};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
