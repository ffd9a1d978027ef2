//! Shared state threaded through one workflow invocation

use crate::error::{RoutingFailure, StepError};
use crate::report::FinalReport;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Immutable input of one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Free-text query, e.g. "What's the news on AAPL?"
    pub query: String,
}

impl AnalysisRequest {
    /// Create a request
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Analysis category
///
/// Declaration order is the canonical report order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Price, moving averages, volume
    Technical,
    /// Valuation, profitability, balance sheet
    Fundamental,
    /// Headlines and sentiment
    News,
    /// Market-wide context
    Macro,
}

impl StepKind {
    /// All kinds in canonical order
    pub const ALL: [Self; 4] = [Self::Technical, Self::Fundamental, Self::News, Self::Macro];

    /// Report section title
    pub fn title(self) -> &'static str {
        match self {
            Self::Technical => "Technical Analysis",
            Self::Fundamental => "Fundamental Analysis",
            Self::News => "News & Sentiment Analysis",
            Self::Macro => "Macro Analysis",
        }
    }

    /// Short lowercase name
    pub fn key(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Fundamental => "fundamental",
            Self::News => "news",
            Self::Macro => "macro",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Which ticker to analyze and which steps to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// Uppercase ticker symbol, never empty
    pub ticker: String,
    /// Steps to run
    pub enabled_steps: BTreeSet<StepKind>,
    /// Free-text explanation, non-binding
    pub rationale: String,
}

impl RoutingDecision {
    /// Build a decision, normalizing the ticker
    ///
    /// Surrounding whitespace and a leading `$` are stripped and the symbol is
    /// uppercased. Anything that is not shaped like an exchange symbol, such as
    /// a company name or a placeholder like `UNKNOWN` or `N/A`, is a
    /// [`RoutingFailure::NoTicker`].
    pub fn new(
        query: &str,
        ticker: &str,
        enabled_steps: impl IntoIterator<Item = StepKind>,
        rationale: impl Into<String>,
    ) -> Result<Self, RoutingFailure> {
        let ticker = ticker.trim().trim_start_matches('$').trim().to_uppercase();
        if !is_ticker_symbol(&ticker) {
            return Err(RoutingFailure::NoTicker(query.to_string()));
        }

        Ok(Self {
            ticker,
            enabled_steps: enabled_steps.into_iter().collect(),
            rationale: rationale.into(),
        })
    }

    /// Whether `kind` should run
    pub fn is_enabled(&self, kind: StepKind) -> bool {
        self.enabled_steps.contains(&kind)
    }
}

/// Markers routers return instead of a symbol
const PLACEHOLDER_TICKERS: &[&str] = &["UNKNOWN", "NONE", "NULL", "NA", "NIL", "TBD"];

/// Longest accepted symbol, e.g. `BRK-B` or `^GSPC` fit easily
const MAX_TICKER_LEN: usize = 10;

/// Uppercase letters, digits, `.`, `-` and `^`, with at least one letter
fn is_ticker_symbol(ticker: &str) -> bool {
    (1..=MAX_TICKER_LEN).contains(&ticker.len())
        && ticker
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '-' | '^'))
        && ticker.chars().any(|c| c.is_ascii_uppercase())
        && !PLACEHOLDER_TICKERS.contains(&ticker)
}

/// Outcome of one step that was enabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Which step produced this
    pub kind: StepKind,
    /// Analysis text when the step succeeded
    pub content: Option<String>,
    /// Failure when it did not
    pub error: Option<StepError>,
}

impl StepResult {
    /// Successful result
    pub fn success(kind: StepKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: Some(content.into()),
            error: None,
        }
    }

    /// Failed result; content is absent
    pub fn failure(kind: StepKind, error: StepError) -> Self {
        Self {
            kind,
            content: None,
            error: Some(error),
        }
    }

    /// Content, only when the step succeeded
    pub fn usable_content(&self) -> Option<&str> {
        match (&self.error, &self.content) {
            (None, Some(content)) if !content.trim().is_empty() => Some(content),
            _ => None,
        }
    }
}

/// Lifecycle of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Created, nothing ran yet
    Start,
    /// Router returned a decision
    Routed,
    /// Enabled steps were scheduled
    StepsDispatched,
    /// Every scheduled step returned
    StepsCompleted,
    /// Outlook text is set (possibly the placeholder)
    Synthesized,
    /// Report is set; terminal
    Assembled,
    /// Routing failed; terminal
    Failed,
}

impl Phase {
    /// Whether `next` directly follows `self`
    pub fn can_advance_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Start, Self::Routed | Self::Failed)
                | (Self::Routed, Self::StepsDispatched | Self::Failed)
                | (Self::StepsDispatched, Self::StepsCompleted)
                | (Self::StepsCompleted, Self::Synthesized)
                | (Self::Synthesized, Self::Assembled)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Routed => "routed",
            Self::StepsDispatched => "steps_dispatched",
            Self::StepsCompleted => "steps_completed",
            Self::Synthesized => "synthesized",
            Self::Assembled => "assembled",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Accumulator owned by the engine for the length of one invocation
///
/// Mutators are crate-private and only the engine calls them, one phase at a
/// time. Once assembled the state moves into the
/// [`WorkflowOutcome`](crate::WorkflowOutcome), which hands out shared
/// references only.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    request: AnalysisRequest,
    phase: Phase,
    decision: Option<RoutingDecision>,
    results: IndexMap<StepKind, StepResult>,
    outlook: Option<String>,
    report: Option<FinalReport>,
}

impl WorkflowState {
    /// Fresh state for `request`
    pub fn new(request: AnalysisRequest) -> Self {
        Self {
            request,
            phase: Phase::Start,
            decision: None,
            results: IndexMap::new(),
            outlook: None,
            report: None,
        }
    }

    /// The request
    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Routing decision, once routed
    pub fn decision(&self) -> Option<&RoutingDecision> {
        self.decision.as_ref()
    }

    /// Step results in execution order
    pub fn results(&self) -> &IndexMap<StepKind, StepResult> {
        &self.results
    }

    /// Outlook text, once synthesized
    pub fn outlook(&self) -> Option<&str> {
        self.outlook.as_deref()
    }

    /// Final report, once assembled
    pub fn report(&self) -> Option<&FinalReport> {
        self.report.as_ref()
    }

    pub(crate) fn advance(&mut self, next: Phase) {
        debug_assert!(
            self.phase.can_advance_to(next),
            "illegal transition {} -> {next}",
            self.phase
        );
        self.phase = next;
    }

    pub(crate) fn set_decision(&mut self, decision: RoutingDecision) {
        self.decision = Some(decision);
        self.advance(Phase::Routed);
    }

    /// Record a step result; returns false if `kind` already has one
    pub(crate) fn record(&mut self, result: StepResult) -> bool {
        if self.report.is_some() || self.results.contains_key(&result.kind) {
            return false;
        }
        self.results.insert(result.kind, result);
        true
    }

    pub(crate) fn set_outlook(&mut self, outlook: String) {
        self.outlook = Some(outlook);
        self.advance(Phase::Synthesized);
    }

    pub(crate) fn set_report(&mut self, report: FinalReport) {
        self.report = Some(report);
        self.advance(Phase::Assembled);
    }
}
