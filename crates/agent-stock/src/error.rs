//! Error types for stock data and analysis operations

use agent_llm::LLMError;
use agent_prompt::PromptError;
use agent_workflow::{ErrorKind, StepError};
use thiserror::Error;

/// Stock data specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// The provider has no data for the symbol
    #[error("no data found for {symbol}")]
    NotFound {
        symbol: String,
    },

    /// The news search returned nothing for the symbol
    #[error("no news found for {0}")]
    NoNews(String),

    /// Provider returned an error payload or an unexpected status
    #[error("{provider} error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// Rate limit exceeded for API
    #[error("rate limit exceeded for {provider}")]
    RateLimitExceeded {
        provider: &'static str,
    },

    /// Network or HTTP error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Technical indicator calculation error
    #[error("indicator error: {0}")]
    Indicator(String),

    /// Missing credential or bad setting
    #[error("configuration error: {0}")]
    Config(String),

    /// Text generation failed
    #[error("generation failed: {0}")]
    Generation(#[from] LLMError),

    /// Prompt lookup or rendering failed
    #[error("prompt error: {0}")]
    Prompt(#[from] PromptError),
}

impl StockError {
    /// Provider error helper
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
        }
    }

    /// Not-found helper
    pub fn not_found(symbol: impl Into<String>) -> Self {
        Self::NotFound {
            symbol: symbol.into(),
        }
    }
}

impl From<StockError> for StepError {
    fn from(err: StockError) -> Self {
        let kind = match err {
            StockError::Generation(_) | StockError::Prompt(_) => ErrorKind::Generation,
            _ => ErrorKind::DataRetrieval,
        };
        StepError::new(kind, err.to_string())
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StockError::not_found("ZZZZ");
        assert_eq!(err.to_string(), "no data found for ZZZZ");

        let err = StockError::provider("Alpha Vantage", "Invalid API call");
        assert_eq!(err.to_string(), "Alpha Vantage error: Invalid API call");
    }

    #[test]
    fn test_step_error_conversion() {
        let step: StepError = StockError::not_found("ZZZZ").into();
        assert_eq!(step.kind, ErrorKind::DataRetrieval);
        assert_eq!(step.message, "no data found for ZZZZ");

        let step: StepError = StockError::Generation(LLMError::RateLimitExceeded("slow down".into())).into();
        assert_eq!(step.kind, ErrorKind::Generation);
    }
}
