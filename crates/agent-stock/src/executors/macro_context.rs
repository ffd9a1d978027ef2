//! Market-wide context: index trend, volatility, sector, sentiment, geopolitics

use super::{AnalystModel, clean_snippet, into_step_result};
use crate::data::{MarketData, SentimentIndex, WebSearch};
use crate::error::{Result, StockError};
use crate::models::{FearGreed, QuoteSnapshot, SearchHit, fmt_num, fmt_pct, fmt_price};
use crate::sector::sector_etf;
use agent_prompt::PromptId;
use agent_workflow::{StepExecutor, StepKind, StepResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Search query for market-moving geopolitical news
pub const GEOPOLITICAL_QUERY: &str = "geopolitical risk market impact news today";

const MARKET_SYMBOL: &str = "SPY";
const VOLATILITY_SYMBOL: &str = "^VIX";
const SNIPPET_CHARS: usize = 200;

/// Everything the macro prompt is shown
#[derive(Debug, Default)]
pub(crate) struct MarketContext {
    pub spy: Option<QuoteSnapshot>,
    pub vix: Option<QuoteSnapshot>,
    pub sector: Option<String>,
    pub sector_etf: Option<&'static str>,
    pub sector_quote: Option<QuoteSnapshot>,
    pub fear_greed: FearGreed,
    pub news: Vec<SearchHit>,
}

impl MarketContext {
    fn has_market_data(&self) -> bool {
        self.spy.is_some()
            || self.vix.is_some()
            || self.sector_quote.is_some()
            || self.fear_greed.value.is_some()
    }
}

/// Macro analysis step
pub struct MacroAnalyst {
    market: Arc<dyn MarketData>,
    search: Arc<dyn WebSearch>,
    sentiment: Arc<dyn SentimentIndex>,
    model: AnalystModel,
    news_limit: usize,
}

impl MacroAnalyst {
    /// Create the step
    pub fn new(
        market: Arc<dyn MarketData>,
        search: Arc<dyn WebSearch>,
        sentiment: Arc<dyn SentimentIndex>,
        model: AnalystModel,
        news_limit: usize,
    ) -> Self {
        Self {
            market,
            search,
            sentiment,
            model,
            news_limit,
        }
    }

    async fn snapshot(&self, symbol: &str) -> Option<QuoteSnapshot> {
        match self.market.quote_snapshot(symbol).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(%symbol, error = %e, "Market snapshot unavailable");
                None
            }
        }
    }

    async fn sector(&self, ticker: &str) -> (Option<String>, Option<&'static str>, Option<QuoteSnapshot>) {
        let sector = match self.market.financials(ticker).await {
            Ok(financials) => financials.sector,
            Err(e) => {
                debug!(error = %e, "Sector lookup failed");
                None
            }
        };
        let etf = sector.as_deref().and_then(sector_etf);
        let quote = match etf {
            Some(etf) => self.snapshot(etf).await,
            None => None,
        };
        (sector, etf, quote)
    }

    async fn headlines(&self) -> Vec<SearchHit> {
        self.search
            .search(GEOPOLITICAL_QUERY, self.news_limit)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Geopolitical news search failed");
                Vec::new()
            })
    }

    pub(crate) async fn gather(&self, ticker: &str) -> MarketContext {
        let (spy, vix, (sector, sector_etf, sector_quote), fear_greed, news) = futures::join!(
            self.snapshot(MARKET_SYMBOL),
            self.snapshot(VOLATILITY_SYMBOL),
            self.sector(ticker),
            self.sentiment.fear_greed(),
            self.headlines(),
        );

        MarketContext {
            spy,
            vix,
            sector,
            sector_etf,
            sector_quote,
            fear_greed,
            news,
        }
    }

    async fn analyze(&self, ticker: &str) -> Result<String> {
        let context = self.gather(ticker).await;
        if !context.has_market_data() {
            return Err(StockError::provider(
                "market data",
                "no market indices or sentiment available",
            ));
        }

        let facts = macro_facts(ticker, &context);
        self.model
            .analyze(StepKind::Macro, PromptId::MacroAnalyst, ticker, &facts)
            .await
    }
}

#[async_trait]
impl StepExecutor for MacroAnalyst {
    fn kind(&self) -> StepKind {
        StepKind::Macro
    }

    #[instrument(name = "macro_step", skip(self))]
    async fn run(&self, ticker: &str) -> StepResult {
        into_step_result(StepKind::Macro, self.analyze(ticker).await)
    }
}

/// Facts block for the macro prompt
pub(crate) fn macro_facts(ticker: &str, c: &MarketContext) -> String {
    let spy = c.spy.clone().unwrap_or_default();
    let vix = c.vix.clone().unwrap_or_default();

    let mut out = format!(
        "### Market context for {ticker}\n\
         Market health (SPY):\n\
         - Price: {}\n\
         - 50D MA / 200D MA: {} / {}\n\
         - 1Y change: {}\n\
         Volatility (VIX):\n\
         - Level: {}\n\
         - 1Y change: {}\n",
        fmt_price(spy.current_price),
        fmt_price(spy.fifty_day_ma),
        fmt_price(spy.two_hundred_day_ma),
        fmt_pct(spy.price_change_pct),
        fmt_num(vix.current_price),
        fmt_pct(vix.price_change_pct),
    );

    match (c.sector.as_deref(), c.sector_etf) {
        (Some(sector), Some(etf)) => {
            let quote = c.sector_quote.clone().unwrap_or_default();
            out.push_str(&format!(
                "Sector ({sector}, {etf}):\n\
                 - Price: {}\n\
                 - 50D MA: {}\n\
                 - 1Y change: {}\n",
                fmt_price(quote.current_price),
                fmt_price(quote.fifty_day_ma),
                fmt_pct(quote.price_change_pct),
            ));
        }
        _ => out.push_str("Sector: Not available\n"),
    }

    let sentiment = match (c.fear_greed.value, c.fear_greed.label.as_deref()) {
        (Some(value), Some(label)) => format!("{value} ({label})"),
        (Some(value), None) => value.to_string(),
        _ => "Not available".to_string(),
    };
    out.push_str(&format!("Sentiment:\n- Fear & Greed: {sentiment}\n"));

    out.push_str(&format!("\n### Geopolitical news (\"{GEOPOLITICAL_QUERY}\")\n"));
    if c.news.is_empty() {
        out.push_str("- Not available\n");
    }
    for (i, hit) in c.news.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, hit.headline));
        let snippet = clean_snippet(&hit.snippet, SNIPPET_CHARS);
        if !snippet.is_empty() {
            out.push_str(&format!("   {snippet}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MockMarketData, MockSentimentIndex, MockWebSearch};
    use crate::executors::testing;
    use crate::models::Financials;
    use agent_workflow::ErrorKind;

    fn snapshot(price: f64) -> QuoteSnapshot {
        QuoteSnapshot {
            current_price: Some(price),
            ..QuoteSnapshot::default()
        }
    }

    fn quiet_search() -> MockWebSearch {
        let mut search = MockWebSearch::new();
        search
            .expect_search()
            .withf(|query, _| query == GEOPOLITICAL_QUERY)
            .returning(|_, _| Ok(Vec::new()));
        search
    }

    #[tokio::test]
    async fn test_gathers_sector_etf() {
        let mut market = MockMarketData::new();
        market.expect_financials().returning(|_| {
            Ok(Financials {
                sector: Some("Technology".to_string()),
                ..Financials::default()
            })
        });
        market.expect_quote_snapshot().returning(|symbol| match symbol {
            "SPY" => Ok(snapshot(580.0)),
            "^VIX" => Ok(snapshot(14.2)),
            "XLK" => Ok(snapshot(230.0)),
            other => Err(StockError::not_found(other)),
        });
        let mut sentiment = MockSentimentIndex::new();
        sentiment
            .expect_fear_greed()
            .returning(|| FearGreed::from_value(62));
        let (model, provider) = testing::model(Some("Risk-on backdrop."));

        let step = MacroAnalyst::new(
            Arc::new(market),
            Arc::new(quiet_search()),
            Arc::new(sentiment),
            model,
            5,
        );
        let result = step.run("NVDA").await;

        assert_eq!(result.usable_content(), Some("Risk-on backdrop."));
        let seen = provider.seen.lock().unwrap();
        assert!(seen[0].contains("- Price: $580.00"));
        assert!(seen[0].contains("- Level: 14.20"));
        assert!(seen[0].contains("Sector (Technology, XLK):"));
        assert!(seen[0].contains("- Fear & Greed: 62 (Greed)"));
        assert!(seen[0].contains("### Geopolitical news"));
    }

    #[tokio::test]
    async fn test_partial_gaps_are_rendered() {
        let mut market = MockMarketData::new();
        market
            .expect_financials()
            .returning(|_| Err(StockError::Config("no key".to_string())));
        market.expect_quote_snapshot().returning(|symbol| match symbol {
            "SPY" => Ok(snapshot(580.0)),
            other => Err(StockError::not_found(other)),
        });
        let mut sentiment = MockSentimentIndex::new();
        sentiment.expect_fear_greed().returning(FearGreed::default);

        let step = MacroAnalyst::new(
            Arc::new(market),
            Arc::new(quiet_search()),
            Arc::new(sentiment),
            testing::model(Some("ok")).0,
            5,
        );
        let context = step.gather("AAPL").await;
        let facts = macro_facts("AAPL", &context);

        assert!(facts.contains("- Level: Not available"));
        assert!(facts.contains("Sector: Not available"));
        assert!(facts.contains("- Fear & Greed: Not available"));
        assert!(facts.ends_with("- Not available\n"));
    }

    #[tokio::test]
    async fn test_fails_when_every_market_source_fails() {
        let mut market = MockMarketData::new();
        market
            .expect_financials()
            .returning(|symbol| Err(StockError::not_found(symbol)));
        market
            .expect_quote_snapshot()
            .returning(|symbol| Err(StockError::not_found(symbol)));
        let mut sentiment = MockSentimentIndex::new();
        sentiment.expect_fear_greed().returning(FearGreed::default);
        let (model, provider) = testing::model(Some("unused"));

        let step = MacroAnalyst::new(
            Arc::new(market),
            Arc::new(quiet_search()),
            Arc::new(sentiment),
            model,
            5,
        );
        let result = step.run("AAPL").await;

        assert_eq!(result.error.map(|e| e.kind), Some(ErrorKind::DataRetrieval));
        assert!(provider.seen.lock().unwrap().is_empty());
    }
}
