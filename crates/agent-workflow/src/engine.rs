//! The workflow state machine
//!
//! `Start -> Routed -> StepsDispatched -> StepsCompleted -> Synthesized ->
//! Assembled`, with `Failed` reachable only while routing. The router always
//! finishes before any step starts; steps are independent of each other;
//! synthesis waits for every dispatched step.
//!
//! Dropping the future returned by [`WorkflowEngine::run`] cancels whichever
//! call is in flight and discards partial results.

use crate::error::{Result, RoutingFailure, StepError, SynthesisFailure, WorkflowError};
use crate::observer::{NoopObserver, StepStatus, WorkflowObserver};
use crate::report::{self, FinalReport};
use crate::state::{AnalysisRequest, Phase, RoutingDecision, StepKind, StepResult, WorkflowState};
use crate::summary::InvestmentSummary;
use crate::traits::{Router, StepExecutor, Synthesizer};
use agent_utils::{AgentSettings, ExecutionMode};
use futures::future::join_all;
use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

/// Outlook text used when synthesis fails
pub const OUTLOOK_UNAVAILABLE: &str = "Outlook unavailable";

/// Engine behaviour
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Concurrent or sequential step scheduling
    pub execution: ExecutionMode,
    /// Steps added to every decision, whatever the router chose
    pub always_run: BTreeSet<StepKind>,
    /// Budget for the routing call
    pub router_timeout: Option<Duration>,
    /// Budget for each step
    pub step_timeout: Option<Duration>,
    /// Budget for the synthesis call
    pub synthesis_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            execution: ExecutionMode::Concurrent,
            always_run: BTreeSet::new(),
            router_timeout: None,
            step_timeout: None,
            synthesis_timeout: None,
        }
    }
}

impl EngineConfig {
    /// Derive engine settings from agent settings
    pub fn from_settings(settings: &AgentSettings) -> Self {
        let mut always_run = BTreeSet::new();
        if settings.macro_always_on {
            always_run.insert(StepKind::Macro);
        }

        Self {
            execution: settings.execution,
            always_run,
            router_timeout: Some(Duration::from_secs(settings.router_timeout_secs)),
            step_timeout: Some(Duration::from_secs(settings.step_timeout_secs)),
            synthesis_timeout: Some(Duration::from_secs(settings.synthesis_timeout_secs)),
        }
    }
}

/// Everything a successful invocation produced
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    /// Normalized ticker
    pub ticker: String,
    /// Decision the steps ran under
    pub decision: RoutingDecision,
    /// Assembled report
    pub report: FinalReport,
    /// Headline fields parsed from the outlook
    pub summary: InvestmentSummary,
    /// Final state, read-only
    pub state: WorkflowState,
}

impl WorkflowOutcome {
    /// Report rendered as markdown
    pub fn markdown(&self) -> String {
        self.report.to_markdown()
    }
}

async fn within<F: Future>(limit: Option<Duration>, fut: F) -> std::result::Result<F::Output, Duration> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| limit),
        None => Ok(fut.await),
    }
}

/// Runs router, steps, synthesizer and assembler for one query at a time
///
/// The engine holds no per-invocation state; one instance serves any number
/// of sequential or concurrent invocations.
#[derive(Clone)]
pub struct WorkflowEngine {
    router: Arc<dyn Router>,
    executors: HashMap<StepKind, Arc<dyn StepExecutor>>,
    synthesizer: Arc<dyn Synthesizer>,
    observer: Arc<dyn WorkflowObserver>,
    config: EngineConfig,
}

impl WorkflowEngine {
    /// Create a new engine builder
    pub fn builder() -> WorkflowEngineBuilder {
        WorkflowEngineBuilder::default()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Same engine reporting progress to `observer`
    pub fn with_observer(mut self, observer: Arc<dyn WorkflowObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Analyze `query` and return the markdown report
    pub async fn analyze(&self, query: &str) -> Result<String> {
        let outcome = self.run(AnalysisRequest::new(query)).await?;
        Ok(outcome.markdown())
    }

    /// Run one invocation
    ///
    /// Only a routing failure is returned as an error; every other failure
    /// degrades the report.
    pub async fn run(&self, request: AnalysisRequest) -> Result<WorkflowOutcome> {
        let run_id = Uuid::new_v4();
        let span = info_span!("workflow", %run_id, query = %request.query);
        self.execute(request).instrument(span).await
    }

    async fn execute(&self, request: AnalysisRequest) -> Result<WorkflowOutcome> {
        let mut state = WorkflowState::new(request);
        self.observer.on_phase(Phase::Start);

        let decision = match self.route(&state.request().query).await {
            Ok(decision) => self.apply_policy(decision),
            Err(failure) => {
                warn!(error = %failure, "Routing failed, aborting");
                state.advance(Phase::Failed);
                self.observer.on_phase(Phase::Failed);
                return Err(WorkflowError::Routing(failure));
            }
        };

        info!(
            ticker = %decision.ticker,
            steps = ?decision.enabled_steps,
            rationale = %decision.rationale,
            "Routed query"
        );
        state.set_decision(decision.clone());
        self.observer.on_decision(&decision);
        self.observer.on_phase(Phase::Routed);

        for kind in StepKind::ALL {
            let status = if decision.is_enabled(kind) {
                StepStatus::Waiting
            } else {
                StepStatus::Skipped
            };
            self.observer.on_step(kind, status);
        }

        state.advance(Phase::StepsDispatched);
        self.observer.on_phase(Phase::StepsDispatched);
        let mut state = self.dispatch(state, &decision).await;
        state.advance(Phase::StepsCompleted);
        self.observer.on_phase(Phase::StepsCompleted);

        let (outlook, summary) = match self.synthesize(&decision.ticker, &state).await {
            Ok(outlook) => {
                let summary = InvestmentSummary::parse(&outlook);
                (outlook, summary)
            }
            Err(failure) => {
                warn!(error = %failure, "Synthesis failed, using placeholder outlook");
                (OUTLOOK_UNAVAILABLE.to_string(), InvestmentSummary::default())
            }
        };
        state.set_outlook(outlook);
        self.observer.on_phase(Phase::Synthesized);

        let report = report::assemble(
            &decision.ticker,
            state.results(),
            state.outlook().unwrap_or(OUTLOOK_UNAVAILABLE),
        );
        state.set_report(report.clone());
        self.observer.on_phase(Phase::Assembled);
        info!(
            sections = report.sections.len(),
            recommendation = %summary.recommendation,
            "Report assembled"
        );

        Ok(WorkflowOutcome {
            ticker: decision.ticker.clone(),
            decision,
            report,
            summary,
            state,
        })
    }

    async fn route(&self, query: &str) -> std::result::Result<RoutingDecision, RoutingFailure> {
        within(self.config.router_timeout, self.router.route(query))
            .await
            .map_err(RoutingFailure::Timeout)?
    }

    fn apply_policy(&self, mut decision: RoutingDecision) -> RoutingDecision {
        for kind in &self.config.always_run {
            if decision.enabled_steps.insert(*kind) {
                debug!(step = %kind, "Step enabled by always-run policy");
            }
        }
        decision
    }

    async fn dispatch(&self, state: WorkflowState, decision: &RoutingDecision) -> WorkflowState {
        let shared = Mutex::new(state);
        let ticker = decision.ticker.as_str();

        match self.config.execution {
            ExecutionMode::Concurrent => {
                join_all(
                    decision
                        .enabled_steps
                        .iter()
                        .map(|&kind| self.run_and_record(kind, ticker, &shared)),
                )
                .await;
            }
            ExecutionMode::Sequential => {
                for &kind in &decision.enabled_steps {
                    self.run_and_record(kind, ticker, &shared).await;
                }
            }
        }

        shared.into_inner()
    }

    async fn run_and_record(&self, kind: StepKind, ticker: &str, shared: &Mutex<WorkflowState>) {
        let result = self.run_step(kind, ticker).await;
        let mut state = shared.lock().await;
        if !state.record(result) {
            warn!(step = %kind, "Duplicate step result dropped");
        }
    }

    async fn run_step(&self, kind: StepKind, ticker: &str) -> StepResult {
        let Some(executor) = self.executors.get(&kind) else {
            warn!(step = %kind, "No executor registered");
            self.observer.on_step(kind, StepStatus::Failed);
            return StepResult::failure(kind, StepError::not_configured(kind.key()));
        };

        self.observer.on_step(kind, StepStatus::Running);
        let mut result = match within(self.config.step_timeout, executor.run(ticker)).await {
            Ok(result) => result,
            Err(limit) => StepResult::failure(kind, StepError::timeout(limit)),
        };
        result.kind = kind;

        match &result.error {
            None => {
                debug!(step = %kind, "Step finished");
                self.observer.on_step(kind, StepStatus::Done);
            }
            Some(error) => {
                warn!(step = %kind, kind = ?error.kind, error = %error, "Step failed");
                self.observer.on_step(kind, StepStatus::Failed);
            }
        }
        result
    }

    async fn synthesize(
        &self,
        ticker: &str,
        state: &WorkflowState,
    ) -> std::result::Result<String, SynthesisFailure> {
        let outlook = within(
            self.config.synthesis_timeout,
            self.synthesizer.synthesize(ticker, state.results()),
        )
        .await
        .map_err(SynthesisFailure::Timeout)??;

        if outlook.trim().is_empty() {
            return Err(SynthesisFailure::Generation("empty outlook".to_string()));
        }
        Ok(outlook)
    }
}

/// Builder for [`WorkflowEngine`]
pub struct WorkflowEngineBuilder {
    router: Option<Arc<dyn Router>>,
    executors: HashMap<StepKind, Arc<dyn StepExecutor>>,
    synthesizer: Option<Arc<dyn Synthesizer>>,
    observer: Arc<dyn WorkflowObserver>,
    config: EngineConfig,
}

impl Default for WorkflowEngineBuilder {
    fn default() -> Self {
        Self {
            router: None,
            executors: HashMap::new(),
            synthesizer: None,
            observer: Arc::new(NoopObserver),
            config: EngineConfig::default(),
        }
    }
}

impl WorkflowEngineBuilder {
    /// Set the router
    pub fn router(mut self, router: Arc<dyn Router>) -> Self {
        self.router = Some(router);
        self
    }

    /// Register an executor under its own [`StepExecutor::kind`]
    ///
    /// A later registration for the same kind replaces the earlier one.
    pub fn executor(mut self, executor: Arc<dyn StepExecutor>) -> Self {
        self.executors.insert(executor.kind(), executor);
        self
    }

    /// Set the synthesizer
    pub fn synthesizer(mut self, synthesizer: Arc<dyn Synthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    /// Set the progress observer
    pub fn observer(mut self, observer: Arc<dyn WorkflowObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Set the engine configuration
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the engine
    ///
    /// Missing executors are allowed; their steps report `NotConfigured`.
    pub fn build(self) -> Result<WorkflowEngine> {
        let router = self
            .router
            .ok_or_else(|| WorkflowError::NotConfigured("router is required".to_string()))?;
        let synthesizer = self
            .synthesizer
            .ok_or_else(|| WorkflowError::NotConfigured("synthesizer is required".to_string()))?;

        Ok(WorkflowEngine {
            router,
            executors: self.executors,
            synthesizer,
            observer: self.observer,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::MockRouter;
    use async_trait::async_trait;
    use indexmap::IndexMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoStep {
        kind: StepKind,
        calls: AtomicUsize,
    }

    impl EchoStep {
        fn new(kind: StepKind) -> Arc<Self> {
            Arc::new(Self {
                kind,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl StepExecutor for EchoStep {
        fn kind(&self) -> StepKind {
            self.kind
        }

        async fn run(&self, ticker: &str) -> StepResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            StepResult::success(self.kind, format!("{} view of {ticker}", self.kind))
        }
    }

    struct CountingSynthesizer;

    #[async_trait]
    impl Synthesizer for CountingSynthesizer {
        async fn synthesize(
            &self,
            ticker: &str,
            results: &IndexMap<StepKind, StepResult>,
        ) -> std::result::Result<String, SynthesisFailure> {
            Ok(format!(
                "**Recommendation:** HOLD (Low Confidence)\n{ticker} from {} inputs",
                results.len()
            ))
        }
    }

    fn router_returning(ticker: &'static str, steps: Vec<StepKind>) -> Arc<MockRouter> {
        let mut router = MockRouter::new();
        router.expect_route().times(1).returning(move |query| {
            RoutingDecision::new(query, ticker, steps.clone(), "test")
        });
        Arc::new(router)
    }

    #[test]
    fn test_build_requires_router_and_synthesizer() {
        let missing_router = WorkflowEngine::builder()
            .synthesizer(Arc::new(CountingSynthesizer))
            .build();
        assert!(matches!(missing_router, Err(WorkflowError::NotConfigured(_))));

        let missing_synth = WorkflowEngine::builder()
            .router(Arc::new(MockRouter::new()))
            .build();
        assert!(matches!(missing_synth, Err(WorkflowError::NotConfigured(_))));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = AgentSettings::default();
        let config = EngineConfig::from_settings(&settings);
        assert!(config.always_run.contains(&StepKind::Macro));
        assert_eq!(config.step_timeout, Some(Duration::from_secs(90)));

        let settings = AgentSettings {
            macro_always_on: false,
            execution: ExecutionMode::Sequential,
            ..AgentSettings::default()
        };
        let config = EngineConfig::from_settings(&settings);
        assert!(config.always_run.is_empty());
        assert_eq!(config.execution, ExecutionMode::Sequential);
    }

    #[tokio::test]
    async fn test_only_enabled_steps_run() {
        let technical = EchoStep::new(StepKind::Technical);
        let news = EchoStep::new(StepKind::News);

        let engine = WorkflowEngine::builder()
            .router(router_returning("aapl", vec![StepKind::News]))
            .executor(technical.clone())
            .executor(news.clone())
            .synthesizer(Arc::new(CountingSynthesizer))
            .build()
            .unwrap();

        let outcome = engine.run(AnalysisRequest::new("news on aapl")).await.unwrap();

        assert_eq!(technical.calls.load(Ordering::SeqCst), 0);
        assert_eq!(news.calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.decision.ticker, "AAPL");
        assert_eq!(outcome.state.phase(), Phase::Assembled);
        assert_eq!(outcome.state.results().len(), 1);
        assert_eq!(outcome.summary.recommendation, "HOLD");
        assert!(outcome.state.outlook().unwrap().contains("from 1 inputs"));
    }

    #[tokio::test]
    async fn test_always_run_policy_adds_macro() {
        let engine = WorkflowEngine::builder()
            .router(router_returning("AAPL", vec![StepKind::News]))
            .executor(EchoStep::new(StepKind::News))
            .executor(EchoStep::new(StepKind::Macro))
            .synthesizer(Arc::new(CountingSynthesizer))
            .config(EngineConfig {
                always_run: BTreeSet::from([StepKind::Macro]),
                ..EngineConfig::default()
            })
            .build()
            .unwrap();

        let outcome = engine.run(AnalysisRequest::new("news on AAPL")).await.unwrap();
        assert!(outcome.decision.is_enabled(StepKind::Macro));
        assert_eq!(outcome.report.step_sections().count(), 2);
    }

    #[tokio::test]
    async fn test_missing_executor_is_not_configured() {
        let engine = WorkflowEngine::builder()
            .router(router_returning("AAPL", vec![StepKind::Fundamental]))
            .synthesizer(Arc::new(CountingSynthesizer))
            .build()
            .unwrap();

        let outcome = engine.run(AnalysisRequest::new("is AAPL cheap")).await.unwrap();
        let result = &outcome.state.results()[&StepKind::Fundamental];
        assert_eq!(
            result.error.as_ref().map(|e| e.kind),
            Some(crate::ErrorKind::NotConfigured)
        );
        assert!(outcome.markdown().contains("_Analysis unavailable: no executor configured for fundamental_"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_router_timeout_is_routing_failure() {
        struct SlowRouter;

        #[async_trait]
        impl Router for SlowRouter {
            async fn route(&self, query: &str) -> std::result::Result<RoutingDecision, RoutingFailure> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                RoutingDecision::new(query, "AAPL", StepKind::ALL, "")
            }
        }

        let engine = WorkflowEngine::builder()
            .router(Arc::new(SlowRouter))
            .synthesizer(Arc::new(CountingSynthesizer))
            .config(EngineConfig {
                router_timeout: Some(Duration::from_secs(5)),
                ..EngineConfig::default()
            })
            .build()
            .unwrap();

        let err = engine.analyze("AAPL").await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Routing(RoutingFailure::Timeout(d)) if d == Duration::from_secs(5)
        ));
    }
}
