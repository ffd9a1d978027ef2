//! Capabilities the analysts read from
//!
//! Each trait is implemented once against a live provider (see [`crate::api`])
//! and substituted with in-memory stand-ins in tests.

use crate::error::Result;
use crate::models::{FearGreed, Financials, QuoteSnapshot, SearchHit};
use async_trait::async_trait;

/// Prices and company financials
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Price and trend snapshot; `StockError::NotFound` for unknown symbols
    async fn quote_snapshot(&self, symbol: &str) -> Result<QuoteSnapshot>;

    /// Company financials; `StockError::NotFound` for unknown symbols
    async fn financials(&self, symbol: &str) -> Result<Financials>;
}

/// Free-text news search
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Up to `limit` hits, best first; no results is `Ok(vec![])`
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>>;
}

/// Market-wide sentiment gauge
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentIndex: Send + Sync {
    /// Current reading; fields are absent when the source is unreachable
    async fn fear_greed(&self) -> FearGreed;
}
