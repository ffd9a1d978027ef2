//! Wiring from resolved settings to a ready [`WorkflowEngine`]
//!
//! Capabilities are constructed once here and shared by every step; nothing
//! downstream re-reads settings or rebuilds clients per call.

use crate::api::{AlphaVantageClient, CnnFearGreed, LiveMarketData, YahooFinanceClient, YahooNewsSearch};
use crate::data::{MarketData, SentimentIndex, WebSearch};
use crate::error::{Result, StockError};
use crate::executors::{AnalystModel, FundamentalAnalyst, MacroAnalyst, NewsAnalyst, TechnicalAnalyst};
use crate::router::{KeywordRouter, LlmRouter};
use crate::synthesizer::LlmSynthesizer;
use agent_llm::providers::{OpenAIConfig, OpenAIProvider};
use agent_llm::{GenerationParams, LLMProvider, TextGenerator};
use agent_prompt::PromptRegistry;
use agent_utils::{RouterKind, Settings};
use agent_workflow::{EngineConfig, Router, WorkflowEngine};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// External capabilities the analysis needs
#[derive(Clone)]
pub struct Capabilities {
    /// Text generation
    pub llm: Arc<dyn LLMProvider>,
    /// Prices and financials
    pub market: Arc<dyn MarketData>,
    /// News search
    pub search: Arc<dyn WebSearch>,
    /// Fear & Greed index
    pub sentiment: Arc<dyn SentimentIndex>,
}

impl Capabilities {
    /// Live providers: OpenAI-compatible model, Yahoo Finance, Alpha Vantage, CNN
    pub fn live(settings: &Settings) -> Result<Self> {
        let llm = &settings.llm;
        let api_key = llm.api_key.clone().ok_or_else(|| {
            StockError::Config(
                "API key required. Set OPENAI_API_KEY or llm.api_key in config.yaml".to_string(),
            )
        })?;

        let mut config = OpenAIConfig::new(api_key).with_timeout(llm.timeout_secs);
        if let Some(base_url) = &llm.base_url {
            config = config.with_api_base(base_url.as_str());
        }
        let provider = OpenAIProvider::with_config(config)?;

        let timeout = Duration::from_secs(settings.data.request_timeout_secs);
        let mut market = LiveMarketData::new(YahooFinanceClient::new());
        match &settings.data.alpha_vantage_api_key {
            Some(key) => {
                market = market.with_alpha_vantage(AlphaVantageClient::free_tier(key.as_str(), timeout)?);
            }
            None => warn!("ALPHA_VANTAGE_API_KEY not set; fundamental analysis will be unavailable"),
        }

        Ok(Self {
            llm: Arc::new(provider),
            market: Arc::new(market),
            search: Arc::new(YahooNewsSearch::new(timeout)?),
            sentiment: Arc::new(CnnFearGreed::new(timeout)?),
        })
    }
}

/// Model parameters taken from settings
pub fn generation_params(settings: &Settings) -> GenerationParams {
    GenerationParams {
        model: settings.llm.model.clone(),
        temperature: settings.llm.temperature,
        max_tokens: settings.llm.max_tokens,
    }
}

/// Build the engine: router, four analysts and synthesizer over `capabilities`
pub fn build_engine(settings: &Settings, capabilities: Capabilities) -> Result<WorkflowEngine> {
    let prompts = Arc::new(PromptRegistry::builtin().with_pins(&settings.prompts.versions)?);
    let generator = TextGenerator::new(capabilities.llm, generation_params(settings));
    let model = AnalystModel::new(generator.clone(), prompts.clone()).verbose(settings.agents.verbose);

    let router: Arc<dyn Router> = match settings.agents.router {
        RouterKind::Llm => Arc::new(LlmRouter::new(generator, prompts)),
        RouterKind::Keyword => Arc::new(KeywordRouter::new()),
    };

    let config = EngineConfig::from_settings(&settings.agents);
    info!(
        model = %settings.llm.model,
        router = ?settings.agents.router,
        execution = ?config.execution,
        always_run = ?config.always_run,
        "Building analysis engine"
    );

    WorkflowEngine::builder()
        .router(router)
        .executor(Arc::new(TechnicalAnalyst::new(
            capabilities.market.clone(),
            model.clone(),
        )))
        .executor(Arc::new(FundamentalAnalyst::new(
            capabilities.market.clone(),
            model.clone(),
        )))
        .executor(Arc::new(NewsAnalyst::new(
            capabilities.search.clone(),
            model.clone(),
            settings.data.news_limit,
        )))
        .executor(Arc::new(MacroAnalyst::new(
            capabilities.market,
            capabilities.search,
            capabilities.sentiment,
            model.clone(),
            settings.data.macro_news_limit,
        )))
        .synthesizer(Arc::new(LlmSynthesizer::new(model)))
        .config(config)
        .build()
        .map_err(|e| StockError::Config(e.to_string()))
}

/// Build the engine against live providers
pub fn build_live_engine(settings: &Settings) -> Result<WorkflowEngine> {
    build_engine(settings, Capabilities::live(settings)?)
}
