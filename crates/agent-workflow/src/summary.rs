//! Headline fields pulled out of the outlook narrative
//!
//! The synthesizer's output is opaque text; this is a best-effort reading of
//! the format the investment prompt asks for. Any field that cannot be found
//! is "N/A".

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Value used for fields missing from the outlook
pub const NOT_AVAILABLE: &str = "N/A";

static RECOMMENDATION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)\*{0,2}Recommendation:?\*{0,2}:?\s*\**\s*(BUY|HOLD|SELL)\b").ok()
});
static CONFIDENCE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\((High|Medium|Low)\s+Confidence\)").ok());
static PRICE_TARGET: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?im)\*{0,2}Price Target:?\*{0,2}:?[ \t]*(\S[^\n]*)").ok());
static THESIS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)\*{0,2}Investment Thesis:?\*{0,2}:?\s*(\S.*)").ok());

/// Summary of an outlook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentSummary {
    /// BUY, HOLD or SELL
    pub recommendation: String,
    /// High, Medium or Low
    pub confidence: String,
    /// Price target line as written
    pub price_target: String,
    /// Thesis paragraph
    pub thesis: String,
}

impl Default for InvestmentSummary {
    fn default() -> Self {
        Self {
            recommendation: NOT_AVAILABLE.to_string(),
            confidence: NOT_AVAILABLE.to_string(),
            price_target: NOT_AVAILABLE.to_string(),
            thesis: NOT_AVAILABLE.to_string(),
        }
    }
}

fn capture(re: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    re.as_ref()?
        .captures(text)?
        .get(1)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl InvestmentSummary {
    /// Parse an outlook narrative
    pub fn parse(outlook: &str) -> Self {
        let defaults = Self::default();
        Self {
            recommendation: capture(&RECOMMENDATION, outlook)
                .map_or(defaults.recommendation, |r| r.to_uppercase()),
            confidence: capture(&CONFIDENCE, outlook)
                .map_or(defaults.confidence, |c| capitalize(&c)),
            price_target: capture(&PRICE_TARGET, outlook).unwrap_or(defaults.price_target),
            thesis: capture(&THESIS, outlook).unwrap_or(defaults.thesis),
        }
    }

    /// Badge class for the recommendation: "buy", "hold", "sell" or "na"
    pub fn badge(&self) -> &'static str {
        match self.recommendation.as_str() {
            "BUY" => "buy",
            "HOLD" => "hold",
            "SELL" => "sell",
            _ => "na",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_outlook() {
        let outlook = "**Recommendation:** BUY (High Confidence)

**Price Target:** $150.00 (+15% from current)
- Based on DCF analysis

**Risk Assessment:** MEDIUM
- Key Risks:
  1. Market volatility
  2. Competition
  3. Regulatory changes

**Investment Thesis:**
Strong growth potential with solid fundamentals and positive momentum.";

        let summary = InvestmentSummary::parse(outlook);
        assert_eq!(summary.recommendation, "BUY");
        assert_eq!(summary.confidence, "High");
        assert_eq!(summary.price_target, "$150.00 (+15% from current)");
        assert!(summary.thesis.starts_with("Strong growth potential"));
        assert_eq!(summary.badge(), "buy");
    }

    #[test]
    fn test_parse_hold_and_sell() {
        let hold = InvestmentSummary::parse(
            "**Recommendation:** HOLD (Medium Confidence)\n\n**Investment Thesis:**\nWait for better entry point.",
        );
        assert_eq!(hold.recommendation, "HOLD");
        assert_eq!(hold.confidence, "Medium");
        assert_eq!(hold.thesis, "Wait for better entry point.");

        let sell = InvestmentSummary::parse("**Recommendation:** sell (low confidence)");
        assert_eq!(sell.recommendation, "SELL");
        assert_eq!(sell.confidence, "Low");
        assert_eq!(sell.price_target, NOT_AVAILABLE);
    }

    #[test]
    fn test_missing_fields_are_na() {
        for text in ["Some random text without structured format.", "", "Outlook unavailable"] {
            let summary = InvestmentSummary::parse(text);
            assert_eq!(summary, InvestmentSummary::default());
            assert_eq!(summary.badge(), "na");
        }
    }
}
