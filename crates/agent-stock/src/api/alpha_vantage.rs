//! Alpha Vantage API client

use crate::error::{Result, StockError};
use crate::models::Financials;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

const BASE_URL: &str = "https://www.alphavantage.co/query";
const PROVIDER: &str = "Alpha Vantage";

/// Free tier allowance per minute
const FREE_TIER_PER_MINUTE: NonZeroU32 = NonZeroU32::MIN.saturating_add(4);

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Alpha Vantage API client
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

/// Company overview payload; Alpha Vantage sends every value as a string
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CompanyOverview {
    pub symbol: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_capitalization: Option<String>,
    #[serde(rename = "PERatio")]
    pub pe_ratio: Option<String>,
    #[serde(rename = "ForwardPE")]
    pub forward_pe: Option<String>,
    #[serde(rename = "EPS")]
    pub eps: Option<String>,
    #[serde(rename = "RevenueTTM")]
    pub revenue_ttm: Option<String>,
    pub profit_margin: Option<String>,
    pub dividend_yield: Option<String>,
}

impl AlphaVantageClient {
    /// Create a client allowing `rate_limit` requests per minute
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(FREE_TIER_PER_MINUTE));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StockError::Network)?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Client with the free-tier rate limit
    pub fn free_tier(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::new(api_key, FREE_TIER_PER_MINUTE.get(), timeout)
    }

    /// Company overview and fundamental data
    #[instrument(skip(self))]
    pub async fn company_overview(&self, symbol: &str) -> Result<CompanyOverview> {
        self.rate_limiter.until_ready().await;

        let params = [
            ("function", "OVERVIEW"),
            ("symbol", symbol),
            ("apikey", self.api_key.as_str()),
        ];
        let response = self.client.get(BASE_URL).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(StockError::provider(
                PROVIDER,
                format!("HTTP error: {}", response.status()),
            ));
        }

        let data: Value = response.json().await?;
        parse_overview(symbol, data)
    }

    /// Financials for `symbol`
    pub async fn financials(&self, symbol: &str) -> Result<Financials> {
        let overview = self.company_overview(symbol).await?;
        debug!(sector = ?overview.sector, "Fetched company overview");
        Ok(overview.into())
    }
}

fn parse_overview(symbol: &str, data: Value) -> Result<CompanyOverview> {
    if let Some(error) = data.get("Error Message").and_then(Value::as_str) {
        return Err(StockError::provider(PROVIDER, error));
    }
    if data.get("Note").is_some() || data.get("Information").is_some() {
        return Err(StockError::RateLimitExceeded { provider: PROVIDER });
    }
    // Unknown symbols come back as an empty object
    if data.as_object().is_none_or(serde_json::Map::is_empty) {
        return Err(StockError::not_found(symbol));
    }

    Ok(serde_json::from_value(data)?)
}

/// Parse an Alpha Vantage numeric string; "None", "-" and "" are absent
fn parse_field<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    let value = value?.trim();
    match value {
        "" | "-" | "None" => None,
        v => v.parse().ok(),
    }
}

fn text_field(value: Option<String>) -> Option<String> {
    value.filter(|v| !matches!(v.trim(), "" | "-" | "None"))
}

impl From<CompanyOverview> for Financials {
    fn from(o: CompanyOverview) -> Self {
        Self {
            market_cap: parse_field(o.market_capitalization.as_deref()),
            pe_ratio: parse_field(o.pe_ratio.as_deref()),
            forward_pe: parse_field(o.forward_pe.as_deref()),
            eps: parse_field(o.eps.as_deref()),
            revenue: parse_field(o.revenue_ttm.as_deref()),
            profit_margin: parse_field(o.profit_margin.as_deref()),
            debt_to_equity: None,
            dividend_yield: parse_field(o.dividend_yield.as_deref()),
            sector: text_field(o.sector).map(|s| title_case(&s)),
            industry: text_field(o.industry).map(|s| title_case(&s)),
        }
    }
}

/// Alpha Vantage reports sectors in upper case ("TECHNOLOGY")
fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overview_to_financials() {
        let data = json!({
            "Symbol": "MSFT",
            "Sector": "TECHNOLOGY",
            "Industry": "SERVICES-PREPACKAGED SOFTWARE",
            "MarketCapitalization": "3100000000000",
            "PERatio": "35.2",
            "ForwardPE": "None",
            "EPS": "11.8",
            "RevenueTTM": "245122000000",
            "ProfitMargin": "0.359",
            "DividendYield": "-"
        });

        let financials: Financials = parse_overview("MSFT", data).unwrap().into();

        assert_eq!(financials.market_cap, Some(3_100_000_000_000));
        assert_eq!(financials.pe_ratio, Some(35.2));
        assert_eq!(financials.forward_pe, None);
        assert_eq!(financials.dividend_yield, None);
        assert_eq!(financials.debt_to_equity, None);
        assert_eq!(financials.sector.as_deref(), Some("Technology"));
        assert_eq!(
            financials.industry.as_deref(),
            Some("Services-prepackaged Software")
        );
    }

    #[test]
    fn test_empty_overview_is_not_found() {
        let err = parse_overview("ZZZZ", json!({})).unwrap_err();
        assert!(matches!(err, StockError::NotFound { .. }));
    }

    #[test]
    fn test_rate_limit_note() {
        let err = parse_overview("AAPL", json!({"Note": "Thank you for using Alpha Vantage!"}))
            .unwrap_err();
        assert!(matches!(err, StockError::RateLimitExceeded { .. }));
    }

    #[tokio::test]
    #[ignore] // Requires network access and ALPHA_VANTAGE_API_KEY
    async fn test_live_overview() {
        let key = std::env::var("ALPHA_VANTAGE_API_KEY").unwrap();
        let client = AlphaVantageClient::free_tier(key, Duration::from_secs(30)).unwrap();
        let financials = client.financials("AAPL").await.unwrap();
        assert!(financials.market_cap.is_some());
    }
}
