//! Valuation and financial health analysis

use super::{AnalystModel, into_step_result};
use crate::data::MarketData;
use crate::error::Result;
use crate::models::{Financials, fmt_fraction_pct, fmt_money, fmt_num, fmt_text};
use agent_prompt::PromptId;
use agent_workflow::{StepExecutor, StepKind, StepResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Fundamental analysis step
pub struct FundamentalAnalyst {
    market: Arc<dyn MarketData>,
    model: AnalystModel,
}

impl FundamentalAnalyst {
    /// Create the step
    pub fn new(market: Arc<dyn MarketData>, model: AnalystModel) -> Self {
        Self { market, model }
    }

    async fn analyze(&self, ticker: &str) -> Result<String> {
        let financials = self.market.financials(ticker).await?;
        let facts = fundamental_facts(ticker, &financials);
        self.model
            .analyze(StepKind::Fundamental, PromptId::FundamentalAnalyst, ticker, &facts)
            .await
    }
}

#[async_trait]
impl StepExecutor for FundamentalAnalyst {
    fn kind(&self) -> StepKind {
        StepKind::Fundamental
    }

    #[instrument(name = "fundamental_step", skip(self))]
    async fn run(&self, ticker: &str) -> StepResult {
        into_step_result(StepKind::Fundamental, self.analyze(ticker).await)
    }
}

/// Facts block for the fundamental prompt
pub(crate) fn fundamental_facts(ticker: &str, f: &Financials) -> String {
    format!(
        "### Fundamental data for {ticker}\n\
         - Sector / Industry: {} / {}\n\
         - Market cap: {}\n\
         - P/E (trailing): {}\n\
         - P/E (forward): {}\n\
         - EPS (trailing): {}\n\
         - Revenue (TTM): {}\n\
         - Profit margin: {}\n\
         - Debt to equity: {}\n\
         - Dividend yield: {}\n",
        fmt_text(f.sector.as_deref()),
        fmt_text(f.industry.as_deref()),
        fmt_money(f.market_cap),
        fmt_num(f.pe_ratio),
        fmt_num(f.forward_pe),
        fmt_num(f.eps),
        fmt_money(f.revenue),
        fmt_fraction_pct(f.profit_margin),
        fmt_num(f.debt_to_equity),
        fmt_fraction_pct(f.dividend_yield),
    )
}
