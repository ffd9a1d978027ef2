//! Routers that turn a free-text query into a ticker and a set of steps
//!
//! [`LlmRouter`] asks the model for a structured decision and fails closed on
//! anything that does not match the schema. [`KeywordRouter`] is an offline
//! rule-based fallback that needs no model call.

use agent_llm::{TextGenerator, schema};
use agent_prompt::{PromptId, PromptRegistry};
use agent_workflow::{Router, RoutingDecision, RoutingFailure, StepKind};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};
use tracing::{debug, instrument};

const DECISION_SCHEMA_NAME: &str = "router_decision";

/// Structured output requested from the model
#[derive(Debug, Clone, Deserialize)]
struct RouterOutput {
    ticker: String,
    run_technical: bool,
    run_fundamental: bool,
    run_news: bool,
    run_macro: bool,
    reasoning: String,
}

impl RouterOutput {
    fn steps(&self) -> BTreeSet<StepKind> {
        [
            (self.run_technical, StepKind::Technical),
            (self.run_fundamental, StepKind::Fundamental),
            (self.run_news, StepKind::News),
            (self.run_macro, StepKind::Macro),
        ]
        .into_iter()
        .filter_map(|(enabled, kind)| enabled.then_some(kind))
        .collect()
    }
}

/// JSON schema for [`RouterOutput`]
pub fn decision_schema() -> Value {
    schema::object(
        json!({
            "ticker": schema::string("Extracted stock ticker symbol (e.g., NVDA, AAPL)"),
            "run_technical": schema::boolean("True if user needs price/trend/volume analysis"),
            "run_fundamental": schema::boolean("True if user needs valuation/financial health analysis"),
            "run_news": schema::boolean("True if user needs news/sentiment analysis"),
            "run_macro": schema::boolean("True if user needs market-wide macro analysis (usually enabled)"),
            "reasoning": schema::string("Brief explanation of the routing decision"),
        }),
        vec![
            "ticker",
            "run_technical",
            "run_fundamental",
            "run_news",
            "run_macro",
            "reasoning",
        ],
    )
}

// ============================================================================
// Model-backed router
// ============================================================================

/// Router backed by a structured-output model call
pub struct LlmRouter {
    generator: TextGenerator,
    prompts: Arc<PromptRegistry>,
}

impl LlmRouter {
    /// Create a router
    pub fn new(generator: TextGenerator, prompts: Arc<PromptRegistry>) -> Self {
        Self { generator, prompts }
    }
}

#[async_trait]
impl Router for LlmRouter {
    #[instrument(name = "llm_route", skip(self))]
    async fn route(&self, query: &str) -> Result<RoutingDecision, RoutingFailure> {
        let system = self
            .prompts
            .render(PromptId::Router, &json!({}))
            .map_err(|e| RoutingFailure::Generation(e.to_string()))?;

        let output: RouterOutput = self
            .generator
            .generate_structured(&system, query, DECISION_SCHEMA_NAME, decision_schema())
            .await
            .map_err(|e| RoutingFailure::Generation(e.to_string()))?;
        debug!(?output, "Model routing decision");

        let steps = output.steps();
        RoutingDecision::new(query, &output.ticker, steps, output.reasoning)
    }
}

// ============================================================================
// Keyword router
// ============================================================================

/// Keywords for step selection
mod keywords {
    pub const TECHNICAL: &[&str] = &[
        "technical",
        "price",
        "trend",
        "chart",
        "pattern",
        "volume",
        "moving average",
        "support",
        "resistance",
        "momentum",
        "rsi",
        "macd",
        "sma",
        "ema",
        "52-week",
    ];

    pub const FUNDAMENTAL: &[&str] = &[
        "fundamental",
        "valuation",
        "valued",
        "overvalued",
        "undervalued",
        "p/e",
        "pe ratio",
        "market cap",
        "earnings",
        "eps",
        "revenue",
        "profit",
        "margin",
        "debt",
        "dividend",
        "financials",
        "balance sheet",
        "cheap",
        "expensive",
    ];

    pub const NEWS: &[&str] = &[
        "news",
        "headline",
        "sentiment",
        "announcement",
        "event",
        "what happened",
        "why is",
    ];

    pub const MACRO: &[&str] = &[
        "macro",
        "the market",
        "market conditions",
        "broader market",
        "fed",
        "interest rate",
        "inflation",
        "economy",
        "economic",
        "vix",
        "volatility",
        "fear & greed",
        "fear and greed",
        "geopolitical",
        "sector",
    ];

    pub const COMPREHENSIVE: &[&str] = &[
        "full",
        "comprehensive",
        "complete",
        "in-depth",
        "thorough",
        "everything",
        "should i buy",
        "should i sell",
        "should i invest",
    ];

    /// Upper-case words that look like tickers but are not
    pub const NOT_TICKERS: &[&str] = &[
        "I", "A", "AI", "CEO", "CFO", "ETF", "EPS", "IPO", "PE", "USA", "US", "USD", "GDP", "CPI",
        "FED", "SEC", "VIX", "SPY", "OK", "Q1", "Q2", "Q3", "Q4",
    ];
}

/// Whole-word, case-insensitive alternation over `words`
///
/// A trailing plural `s` is tolerated so "headlines" still matches "headline".
fn keyword_pattern(words: &[&str]) -> Option<Regex> {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternation})s?\b")).ok()
}

static TECHNICAL: LazyLock<Option<Regex>> = LazyLock::new(|| keyword_pattern(keywords::TECHNICAL));
static FUNDAMENTAL: LazyLock<Option<Regex>> =
    LazyLock::new(|| keyword_pattern(keywords::FUNDAMENTAL));
static NEWS: LazyLock<Option<Regex>> = LazyLock::new(|| keyword_pattern(keywords::NEWS));
static MACRO: LazyLock<Option<Regex>> = LazyLock::new(|| keyword_pattern(keywords::MACRO));
static COMPREHENSIVE: LazyLock<Option<Regex>> =
    LazyLock::new(|| keyword_pattern(keywords::COMPREHENSIVE));

/// Offline router using keyword rules
#[derive(Debug, Clone, Default)]
pub struct KeywordRouter;

impl KeywordRouter {
    /// Create a keyword router
    pub fn new() -> Self {
        Self
    }

    /// First ticker-looking token in `query`
    ///
    /// A `$` prefix marks a ticker explicitly, whatever its case.
    pub fn extract_ticker(&self, query: &str) -> Option<String> {
        for word in query.split_whitespace() {
            if let Some(tagged) = word.strip_prefix('$') {
                let clean = tagged.trim_matches(|c: char| !c.is_ascii_alphanumeric());
                if !clean.is_empty() {
                    return Some(clean.to_uppercase());
                }
            }

            let clean = word
                .split('\'')
                .next()
                .unwrap_or_default()
                .trim_matches(|c: char| !c.is_ascii_alphanumeric());
            if (1..=5).contains(&clean.len())
                && clean.chars().all(|c| c.is_ascii_uppercase())
                && !keywords::NOT_TICKERS.contains(&clean)
            {
                return Some(clean.to_string());
            }
        }
        None
    }

    /// Steps implied by `query`
    pub fn select_steps(&self, query: &str) -> BTreeSet<StepKind> {
        if matches_any(query, &COMPREHENSIVE) {
            return StepKind::ALL.into_iter().collect();
        }

        let steps: BTreeSet<StepKind> = [
            (&TECHNICAL, StepKind::Technical),
            (&FUNDAMENTAL, StepKind::Fundamental),
            (&NEWS, StepKind::News),
            (&MACRO, StepKind::Macro),
        ]
        .into_iter()
        .filter(|(pattern, _)| matches_any(query, pattern))
        .map(|(_, kind)| kind)
        .collect();

        if steps.is_empty() {
            StepKind::ALL.into_iter().collect()
        } else {
            steps
        }
    }
}

fn matches_any(query: &str, pattern: &LazyLock<Option<Regex>>) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(query))
}

#[async_trait]
impl Router for KeywordRouter {
    async fn route(&self, query: &str) -> Result<RoutingDecision, RoutingFailure> {
        let ticker = self.extract_ticker(query).unwrap_or_default();
        let steps = self.select_steps(query);
        let rationale = format!(
            "keyword match: {}",
            steps.iter().map(|s| s.key()).collect::<Vec<_>>().join(", ")
        );
        RoutingDecision::new(query, &ticker, steps, rationale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_llm::{
        CompletionRequest, CompletionResponse, GenerationParams, LLMProvider, Message,
        ResponseFormat, StopReason, TokenUsage,
    };
    use std::sync::Mutex;

    struct StructuredReply {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl LLMProvider for StructuredReply {
        async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(CompletionResponse {
                message: Message::assistant(self.reply.clone()),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &'static str {
            "structured"
        }
    }

    fn llm_router(reply: Value) -> (LlmRouter, Arc<StructuredReply>) {
        let provider = Arc::new(StructuredReply {
            reply: reply.to_string(),
            seen: Mutex::new(Vec::new()),
        });
        let generator = TextGenerator::new(provider.clone(), GenerationParams::default());
        (
            LlmRouter::new(generator, Arc::new(PromptRegistry::builtin())),
            provider,
        )
    }

    #[tokio::test]
    async fn test_llm_router_decision() {
        let (router, provider) = llm_router(json!({
            "ticker": "$aapl",
            "run_technical": false,
            "run_fundamental": false,
            "run_news": true,
            "run_macro": false,
            "reasoning": "news only"
        }));

        let decision = router.route("What's the news on AAPL?").await.unwrap();

        assert_eq!(decision.ticker, "AAPL");
        assert_eq!(decision.enabled_steps, BTreeSet::from([StepKind::News]));
        assert_eq!(decision.rationale, "news only");

        let seen = provider.seen.lock().unwrap();
        assert!(matches!(
            seen[0].response_format,
            Some(ResponseFormat::JsonSchema { ref name, .. }) if name == DECISION_SCHEMA_NAME
        ));
        assert!(seen[0].system.as_deref().unwrap().contains("query router"));
    }

    #[tokio::test]
    async fn test_llm_router_unknown_ticker() {
        let (router, _) = llm_router(json!({
            "ticker": "UNKNOWN",
            "run_technical": true,
            "run_fundamental": true,
            "run_news": true,
            "run_macro": true,
            "reasoning": "no company named"
        }));

        let err = router.route("how are markets?").await.unwrap_err();
        assert!(matches!(err, RoutingFailure::NoTicker(_)));
    }

    #[tokio::test]
    async fn test_llm_router_fails_closed() {
        let (router, _) = llm_router(json!({"ticker": "AAPL", "run_news": true}));
        let err = router.route("news on AAPL").await.unwrap_err();
        assert!(matches!(err, RoutingFailure::Generation(_)));
    }

    #[test]
    fn test_ticker_extraction() {
        let router = KeywordRouter::new();

        assert_eq!(router.extract_ticker("What's the news on AAPL?").as_deref(), Some("AAPL"));
        assert_eq!(router.extract_ticker("Should I buy GOOGL?").as_deref(), Some("GOOGL"));
        assert_eq!(router.extract_ticker("thoughts on $nvda today").as_deref(), Some("NVDA"));
        assert_eq!(router.extract_ticker("Is the CEO of TSLA right?").as_deref(), Some("TSLA"));
        assert_eq!(router.extract_ticker("MSFT's margins").as_deref(), Some("MSFT"));
        assert_eq!(router.extract_ticker("how is the market doing"), None);
    }

    #[test]
    fn test_step_selection() {
        let router = KeywordRouter::new();

        assert_eq!(
            router.select_steps("What's the news on AAPL?"),
            BTreeSet::from([StepKind::News])
        );
        assert_eq!(
            router.select_steps("Is AAPL overvalued?"),
            BTreeSet::from([StepKind::Fundamental])
        );
        assert_eq!(
            router.select_steps("TSLA price and trends"),
            BTreeSet::from([StepKind::Technical])
        );
        assert_eq!(router.select_steps("Full analysis of MSFT").len(), 4);
        assert_eq!(router.select_steps("Should I buy GOOGL?").len(), 4);
        assert_eq!(router.select_steps("Analyze NVDA stock").len(), 4);
        assert_eq!(
            router.select_steps("Any headlines on AMZN?"),
            BTreeSet::from([StepKind::News])
        );
    }

    #[test]
    fn test_keywords_match_whole_words() {
        let router = KeywordRouter::new();

        assert_eq!(router.select_steps("Tell me about FedEx, FDX").len(), 4);
        assert_eq!(
            router.select_steps("Tell me about AAPL and whether it keeps growing").len(),
            4
        );
        assert_eq!(router.select_steps("Analyze AAPL, I want to diversify").len(), 4);

        assert_eq!(
            router.select_steps("Will the Fed cut rates for JPM?"),
            BTreeSet::from([StepKind::Macro])
        );
        assert_eq!(
            router.select_steps("What's the P/E of $AAPL?"),
            BTreeSet::from([StepKind::Fundamental])
        );
        assert_eq!(
            router.select_steps("Is the RSI on AMD overbought?"),
            BTreeSet::from([StepKind::Technical])
        );
    }

    #[tokio::test]
    async fn test_keyword_route() {
        let router = KeywordRouter::new();

        let decision = router.route("What's the news on AAPL?").await.unwrap();
        assert_eq!(decision.ticker, "AAPL");
        assert_eq!(decision.rationale, "keyword match: news");

        let err = router.route("what's new in tech?").await.unwrap_err();
        assert!(matches!(err, RoutingFailure::NoTicker(q) if q == "what's new in tech?"));
    }
}
