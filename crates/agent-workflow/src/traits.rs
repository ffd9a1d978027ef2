//! Seams the engine drives
//!
//! Implementations hold their capabilities (text generation, market data,
//! search) as shared handles built once at startup.

use crate::error::{RoutingFailure, SynthesisFailure};
use crate::state::{RoutingDecision, StepKind, StepResult};
use async_trait::async_trait;
use indexmap::IndexMap;

/// Turns a free-text query into a [`RoutingDecision`]
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Router: Send + Sync {
    /// Extract the ticker and pick the steps relevant to `query`
    async fn route(&self, query: &str) -> Result<RoutingDecision, RoutingFailure>;
}

/// Runs one kind of analysis for a ticker
///
/// Implementations never fail: data and generation errors are returned as a
/// [`StepResult`] with `error` set.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    /// Which step this executor serves
    fn kind(&self) -> StepKind;

    /// Analyze `ticker`
    async fn run(&self, ticker: &str) -> StepResult;
}

/// Combines step results into an outlook narrative
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Produce the outlook for `ticker`
    ///
    /// `results` may hold any subset of step kinds, including none. Kinds
    /// that are absent or failed must be presented to the model as
    /// "Not available".
    async fn synthesize(
        &self,
        ticker: &str,
        results: &IndexMap<StepKind, StepResult>,
    ) -> Result<String, SynthesisFailure>;
}
