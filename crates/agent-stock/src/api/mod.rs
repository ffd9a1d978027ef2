//! API clients for stock data providers

pub mod alpha_vantage;
pub mod fear_greed;
pub mod yahoo;
pub mod yahoo_search;

pub use alpha_vantage::{AlphaVantageClient, CompanyOverview};
pub use fear_greed::CnnFearGreed;
pub use yahoo::YahooFinanceClient;
pub use yahoo_search::YahooNewsSearch;

use crate::data::MarketData;
use crate::error::{Result, StockError};
use crate::models::{Financials, QuoteSnapshot};
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Per-symbol memo of successful financials lookups
///
/// Concurrent callers for the same symbol share one in-flight fetch. A failed
/// fetch is not remembered, so the next caller tries again.
#[derive(Debug, Clone, Default)]
struct FinancialsCache {
    cells: Arc<Mutex<HashMap<String, Arc<OnceCell<Financials>>>>>,
}

impl FinancialsCache {
    async fn get_or_fetch<F, Fut>(&self, symbol: &str, fetch: F) -> Result<Financials>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Financials>>,
    {
        let cell = self
            .cells
            .lock()
            .await
            .entry(symbol.to_uppercase())
            .or_default()
            .clone();
        cell.get_or_try_init(fetch).await.cloned()
    }
}

/// Market data from Yahoo Finance prices and Alpha Vantage fundamentals
///
/// Fundamentals are fetched at most once per symbol for the lifetime of the
/// value, so the fundamental and macro steps share one rate-limited lookup.
#[derive(Debug, Clone)]
pub struct LiveMarketData {
    yahoo: YahooFinanceClient,
    alpha_vantage: Option<AlphaVantageClient>,
    financials: FinancialsCache,
}

impl LiveMarketData {
    /// Prices only; financials fail with a configuration error
    pub fn new(yahoo: YahooFinanceClient) -> Self {
        Self {
            yahoo,
            alpha_vantage: None,
            financials: FinancialsCache::default(),
        }
    }

    /// Add the fundamentals source
    pub fn with_alpha_vantage(mut self, client: AlphaVantageClient) -> Self {
        self.alpha_vantage = Some(client);
        self
    }
}

#[async_trait]
impl MarketData for LiveMarketData {
    async fn quote_snapshot(&self, symbol: &str) -> Result<QuoteSnapshot> {
        self.yahoo.quote_snapshot(symbol).await
    }

    async fn financials(&self, symbol: &str) -> Result<Financials> {
        match &self.alpha_vantage {
            Some(client) => {
                self.financials
                    .get_or_fetch(symbol, || client.financials(symbol))
                    .await
            }
            None => Err(StockError::Config(
                "ALPHA_VANTAGE_API_KEY not set; fundamentals unavailable".to_string(),
            )),
        }
    }
}
