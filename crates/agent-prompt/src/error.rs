//! Error types for prompt operations

use thiserror::Error;

/// Result type for prompt operations
pub type Result<T> = std::result::Result<T, PromptError>;

/// Errors that can occur during prompt operations
#[derive(Error, Debug)]
pub enum PromptError {
    /// The prompt id is not a known prompt
    #[error("Unknown prompt id '{0}'")]
    UnknownPrompt(String),

    /// The requested version does not exist for this prompt
    #[error("Unknown version for prompt '{id}': {version}. Available: {available}")]
    UnknownVersion {
        id: String,
        version: String,
        available: String,
    },

    /// Template rendering failed
    #[error("Failed to render prompt '{id}' v{version}: {detail}")]
    RenderError {
        id: String,
        version: String,
        detail: String,
    },
}
