//! Prompt identifiers

use crate::{PromptError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One prompt per agent role in the analysis pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptId {
    /// Picks the ticker and the analysis steps
    Router,
    /// Price, moving averages and volume
    TechnicalAnalyst,
    /// Valuation and balance sheet
    FundamentalAnalyst,
    /// Headlines and sentiment
    NewsAnalyst,
    /// Market-wide context
    MacroAnalyst,
    /// Final recommendation
    InvestmentAnalyst,
}

impl PromptId {
    /// All prompt ids
    pub const ALL: [Self; 6] = [
        Self::Router,
        Self::TechnicalAnalyst,
        Self::FundamentalAnalyst,
        Self::NewsAnalyst,
        Self::MacroAnalyst,
        Self::InvestmentAnalyst,
    ];

    /// Key used in settings (`prompts.versions.<key>`)
    pub fn key(self) -> &'static str {
        match self {
            Self::Router => "router",
            Self::TechnicalAnalyst => "technical_analyst",
            Self::FundamentalAnalyst => "fundamental_analyst",
            Self::NewsAnalyst => "news_analyst",
            Self::MacroAnalyst => "macro_analyst",
            Self::InvestmentAnalyst => "investment_analyst",
        }
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PromptId {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.key() == s)
            .ok_or_else(|| PromptError::UnknownPrompt(s.to_string()))
    }
}
