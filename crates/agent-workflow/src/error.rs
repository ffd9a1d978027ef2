//! Error taxonomy of a workflow invocation
//!
//! Only [`RoutingFailure`] is fatal. Step failures are recorded on their
//! [`StepResult`](crate::StepResult) and synthesis failures become a
//! placeholder outlook.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Result type for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Why the router could not produce a decision
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutingFailure {
    /// No ticker could be extracted from the query
    #[error("no ticker found in query '{0}'")]
    NoTicker(String),

    /// The text-generation call failed or returned an unusable value
    #[error("routing call failed: {0}")]
    Generation(String),

    /// The routing call did not return in time
    #[error("routing timed out after {0:?}")]
    Timeout(Duration),
}

/// Classification of a step failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The data source failed, timed out at the transport level, or was empty
    DataRetrieval,
    /// Summarizing the retrieved data failed
    Generation,
    /// The step exceeded its time budget
    Timeout,
    /// No executor is registered for the step
    NotConfigured,
}

/// A failure absorbed into a step's result
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct StepError {
    /// Failure class
    pub kind: ErrorKind,
    /// Human-readable reason, shown in the report
    pub message: String,
}

impl StepError {
    /// Create a step error
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Data source failure
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DataRetrieval, message)
    }

    /// Summarization failure
    pub fn generation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Generation, message)
    }

    /// Time budget exceeded
    pub fn timeout(after: Duration) -> Self {
        Self::new(ErrorKind::Timeout, format!("timed out after {after:?}"))
    }

    /// Missing executor
    pub fn not_configured(step: &str) -> Self {
        Self::new(
            ErrorKind::NotConfigured,
            format!("no executor configured for {step}"),
        )
    }
}

/// Why synthesis failed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisFailure {
    /// The text-generation call failed
    #[error("synthesis call failed: {0}")]
    Generation(String),

    /// The synthesis call did not return in time
    #[error("synthesis timed out after {0:?}")]
    Timeout(Duration),
}

/// Fatal errors returned by the engine
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Routing failed; no step ran and no report was produced
    #[error("could not determine ticker/intent: {0}")]
    Routing(#[from] RoutingFailure),

    /// The engine was built without a required component
    #[error("workflow is not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_failure_message() {
        let err = WorkflowError::from(RoutingFailure::NoTicker("hello".to_string()));
        assert_eq!(
            err.to_string(),
            "could not determine ticker/intent: no ticker found in query 'hello'"
        );
    }

    #[test]
    fn test_step_error_constructors() {
        assert_eq!(StepError::data("not found").kind, ErrorKind::DataRetrieval);
        assert_eq!(StepError::generation("quota").kind, ErrorKind::Generation);
        assert_eq!(
            StepError::timeout(Duration::from_secs(2)).to_string(),
            "timed out after 2s"
        );
        assert_eq!(
            StepError::not_configured("news").to_string(),
            "no executor configured for news"
        );
    }
}
