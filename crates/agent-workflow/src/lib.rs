//! Conditional multi-step analysis workflow
//!
//! A [`Router`] reads the query and enables a subset of analysis steps, the
//! enabled [`StepExecutor`]s run, a [`Synthesizer`] combines their output into
//! an outlook, and the results are assembled into a [`FinalReport`] in a fixed
//! section order. Step and synthesis failures degrade the report; only a
//! routing failure aborts the invocation.

pub mod engine;
pub mod error;
pub mod observer;
pub mod report;
pub mod state;
pub mod summary;
pub mod traits;

pub use agent_utils::ExecutionMode;
pub use engine::{EngineConfig, OUTLOOK_UNAVAILABLE, WorkflowEngine, WorkflowEngineBuilder, WorkflowOutcome};
pub use error::{ErrorKind, Result, RoutingFailure, StepError, SynthesisFailure, WorkflowError};
pub use observer::{NoopObserver, StepStatus, WorkflowObserver};
pub use report::{FOOTER, FinalReport, OUTLOOK_TITLE, ReportSection, SectionBody, assemble};
pub use state::{AnalysisRequest, Phase, RoutingDecision, StepKind, StepResult, WorkflowState};
pub use summary::InvestmentSummary;
pub use traits::{Router, StepExecutor, Synthesizer};
