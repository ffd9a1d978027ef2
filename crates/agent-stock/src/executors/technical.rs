//! Price, trend and volume analysis

use super::{AnalystModel, into_step_result};
use crate::data::MarketData;
use crate::error::Result;
use crate::models::{QuoteSnapshot, fmt_count, fmt_pct, fmt_price};
use agent_prompt::PromptId;
use agent_workflow::{StepExecutor, StepKind, StepResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Technical analysis step
pub struct TechnicalAnalyst {
    market: Arc<dyn MarketData>,
    model: AnalystModel,
}

impl TechnicalAnalyst {
    /// Create the step
    pub fn new(market: Arc<dyn MarketData>, model: AnalystModel) -> Self {
        Self { market, model }
    }

    async fn analyze(&self, ticker: &str) -> Result<String> {
        let snapshot = self.market.quote_snapshot(ticker).await?;
        let facts = technical_facts(ticker, &snapshot);
        self.model
            .analyze(StepKind::Technical, PromptId::TechnicalAnalyst, ticker, &facts)
            .await
    }
}

#[async_trait]
impl StepExecutor for TechnicalAnalyst {
    fn kind(&self) -> StepKind {
        StepKind::Technical
    }

    #[instrument(name = "technical_step", skip(self))]
    async fn run(&self, ticker: &str) -> StepResult {
        into_step_result(StepKind::Technical, self.analyze(ticker).await)
    }
}

/// Facts block for the technical prompt
pub(crate) fn technical_facts(ticker: &str, s: &QuoteSnapshot) -> String {
    format!(
        "### Technical data for {ticker}\n\
         - Current price: {}\n\
         - Price change (1Y): {}\n\
         - 50D MA: {}\n\
         - 200D MA: {}\n\
         - 52W high: {}\n\
         - 52W low: {}\n\
         - Volume: {}\n\
         - Avg volume (3M): {}\n",
        fmt_price(s.current_price),
        fmt_pct(s.price_change_pct),
        fmt_price(s.fifty_day_ma),
        fmt_price(s.two_hundred_day_ma),
        fmt_price(s.fifty_two_week_high),
        fmt_price(s.fifty_two_week_low),
        fmt_count(s.volume),
        fmt_count(s.avg_volume),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MockMarketData;
    use crate::error::StockError;
    use crate::executors::testing;
    use agent_workflow::ErrorKind;

    #[test]
    fn test_facts_mark_missing_values() {
        let snapshot = QuoteSnapshot {
            current_price: Some(187.5),
            volume: Some(52_000_000),
            ..QuoteSnapshot::default()
        };
        let facts = technical_facts("AAPL", &snapshot);

        assert!(facts.contains("- Current price: $187.50"));
        assert!(facts.contains("- 200D MA: Not available"));
        assert!(facts.contains("- Volume: 52,000,000"));
        assert!(!facts.contains("$0.00"));
    }

    #[tokio::test]
    async fn test_run_sends_facts_to_model() {
        let mut market = MockMarketData::new();
        market.expect_quote_snapshot().times(1).returning(|_| {
            Ok(QuoteSnapshot {
                current_price: Some(420.0),
                ..QuoteSnapshot::default()
            })
        });
        let (model, provider) = testing::model(Some("Bullish above both averages."));

        let step = TechnicalAnalyst::new(Arc::new(market), model);
        let result = step.run("MSFT").await;

        assert_eq!(result.usable_content(), Some("Bullish above both averages."));
        let seen = provider.seen.lock().unwrap();
        assert!(seen[0].contains("### Technical data for MSFT"));
        assert!(seen[0].contains("- Current price: $420.00"));
    }

    #[tokio::test]
    async fn test_missing_symbol_is_data_failure() {
        let mut market = MockMarketData::new();
        market
            .expect_quote_snapshot()
            .returning(|symbol| Err(StockError::not_found(symbol)));
        let (model, provider) = testing::model(Some("unused"));

        let result = TechnicalAnalyst::new(Arc::new(market), model).run("ZZZZ").await;

        let error = result.error.unwrap();
        assert_eq!(error.kind, ErrorKind::DataRetrieval);
        assert_eq!(error.message, "no data found for ZZZZ");
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generation_failure_is_absorbed() {
        let mut market = MockMarketData::new();
        market
            .expect_quote_snapshot()
            .returning(|_| Ok(QuoteSnapshot::default()));
        let (model, _) = testing::model(None);

        let result = TechnicalAnalyst::new(Arc::new(market), model).run("AAPL").await;

        assert_eq!(result.error.map(|e| e.kind), Some(ErrorKind::Generation));
        assert!(result.content.is_none());
    }
}
