//! Data shapes returned by the market, search and sentiment capabilities
//!
//! Every numeric field is optional: providers routinely omit values and an
//! absent value must never be confused with zero.

use serde::{Deserialize, Serialize};

/// Placeholder written for absent values in facts blocks and prompts
pub const NOT_AVAILABLE: &str = "Not available";

/// Price and trend snapshot for one symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    /// Last traded price
    pub current_price: Option<f64>,
    /// Change over the past year, percent
    pub price_change_pct: Option<f64>,
    /// 50-day simple moving average
    pub fifty_day_ma: Option<f64>,
    /// 200-day simple moving average
    pub two_hundred_day_ma: Option<f64>,
    /// 52-week high
    pub fifty_two_week_high: Option<f64>,
    /// 52-week low
    pub fifty_two_week_low: Option<f64>,
    /// Last session volume
    pub volume: Option<u64>,
    /// Average volume over roughly three months
    pub avg_volume: Option<u64>,
}

/// Valuation and balance-sheet figures for one company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Financials {
    /// Market capitalization in USD
    pub market_cap: Option<u64>,
    /// Trailing P/E
    pub pe_ratio: Option<f64>,
    /// Forward P/E
    pub forward_pe: Option<f64>,
    /// Trailing earnings per share
    pub eps: Option<f64>,
    /// Trailing twelve-month revenue in USD
    pub revenue: Option<u64>,
    /// Profit margin as a fraction
    pub profit_margin: Option<f64>,
    /// Debt to equity ratio
    pub debt_to_equity: Option<f64>,
    /// Dividend yield as a fraction
    pub dividend_yield: Option<f64>,
    /// Sector name
    pub sector: Option<String>,
    /// Industry name
    pub industry: Option<String>,
}

/// One search result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Title
    pub headline: String,
    /// Body excerpt, possibly empty
    pub snippet: String,
    /// Publisher
    pub source: Option<String>,
    /// Publication date as the provider reports it
    pub published: Option<String>,
}

/// CNN Fear & Greed reading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FearGreed {
    /// Index value, 0-100
    pub value: Option<u8>,
    /// Rating such as "Extreme Fear"
    pub label: Option<String>,
}

impl FearGreed {
    /// Reading with the label derived from the value
    pub fn from_value(value: u8) -> Self {
        Self {
            value: Some(value),
            label: Some(fear_greed_label(value).to_string()),
        }
    }
}

/// Rating band for a Fear & Greed value
pub fn fear_greed_label(value: u8) -> &'static str {
    match value {
        0..=24 => "Extreme Fear",
        25..=44 => "Fear",
        45..=55 => "Neutral",
        56..=75 => "Greed",
        _ => "Extreme Greed",
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// `$123.45` or "Not available"
pub fn fmt_price(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("${v:.2}"))
}

/// `12.34%` or "Not available"
pub fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}%"))
}

/// Fraction rendered as a percentage, `0.2534` -> `25.34%`
pub fn fmt_fraction_pct(value: Option<f64>) -> String {
    fmt_pct(value.map(|v| v * 100.0))
}

/// Plain number with two decimals or "Not available"
pub fn fmt_num(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"))
}

/// Integer with thousands separators or "Not available"
pub fn fmt_count(value: Option<u64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), group_thousands)
}

/// Dollar amount scaled to T/B/M or "Not available"
pub fn fmt_money(value: Option<u64>) -> String {
    let Some(v) = value else {
        return NOT_AVAILABLE.to_string();
    };
    let v = v as f64;
    if v >= 1e12 {
        format!("${:.2}T", v / 1e12)
    } else if v >= 1e9 {
        format!("${:.2}B", v / 1e9)
    } else if v >= 1e6 {
        format!("${:.2}M", v / 1e6)
    } else {
        format!("${v:.0}")
    }
}

/// Text or "Not available"
pub fn fmt_text(value: Option<&str>) -> &str {
    value.filter(|s| !s.trim().is_empty()).unwrap_or(NOT_AVAILABLE)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fear_greed_bands() {
        assert_eq!(fear_greed_label(0), "Extreme Fear");
        assert_eq!(fear_greed_label(24), "Extreme Fear");
        assert_eq!(fear_greed_label(25), "Fear");
        assert_eq!(fear_greed_label(44), "Fear");
        assert_eq!(fear_greed_label(55), "Neutral");
        assert_eq!(fear_greed_label(75), "Greed");
        assert_eq!(fear_greed_label(76), "Extreme Greed");
        assert_eq!(FearGreed::from_value(50).label.as_deref(), Some("Neutral"));
    }

    #[test]
    fn test_absent_values_are_not_zero() {
        assert_eq!(fmt_price(None), NOT_AVAILABLE);
        assert_eq!(fmt_price(Some(0.0)), "$0.00");
        assert_eq!(fmt_count(None), NOT_AVAILABLE);
        assert_eq!(fmt_text(Some("  ")), NOT_AVAILABLE);
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(fmt_count(Some(1_234_567)), "1,234,567");
        assert_eq!(fmt_count(Some(999)), "999");
        assert_eq!(fmt_money(Some(3_450_000_000_000)), "$3.45T");
        assert_eq!(fmt_money(Some(12_500_000)), "$12.50M");
        assert_eq!(fmt_fraction_pct(Some(0.2534)), "25.34%");
        assert_eq!(fmt_pct(Some(-3.5)), "-3.50%");
    }
}
