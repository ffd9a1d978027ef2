//! Yahoo Finance price history client

use crate::error::{Result, StockError};
use crate::models::QuoteSnapshot;
use chrono::{Duration, Utc};
use ta::Next;
use ta::indicators::SimpleMovingAverage;
use time::OffsetDateTime;
use tracing::{debug, instrument};
use yahoo_finance_api as yahoo;

const PROVIDER: &str = "Yahoo Finance";

/// Sessions averaged for the volume baseline, about three months
const AVG_VOLUME_SESSIONS: usize = 63;

/// One daily bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Yahoo Finance API client
#[derive(Debug, Clone, Default)]
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    /// Daily bars for the past year, oldest first
    #[instrument(skip(self))]
    pub async fn daily_bars(&self, symbol: &str) -> Result<Vec<Bar>> {
        let provider =
            yahoo::YahooConnector::new().map_err(|e| StockError::provider(PROVIDER, e.to_string()))?;

        let end = Utc::now();
        let start = end - Duration::days(365);
        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| StockError::provider(PROVIDER, format!("invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| StockError::provider(PROVIDER, format!("invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| StockError::provider(PROVIDER, e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| StockError::provider(PROVIDER, e.to_string()))?;

        debug!(bars = quotes.len(), "Fetched daily history");
        Ok(quotes
            .iter()
            .map(|q| Bar {
                high: q.high,
                low: q.low,
                close: q.close,
                volume: q.volume,
            })
            .collect())
    }

    /// Price and trend snapshot built from a year of daily bars
    pub async fn quote_snapshot(&self, symbol: &str) -> Result<QuoteSnapshot> {
        let bars = self.daily_bars(symbol).await?;
        snapshot_from_bars(symbol, &bars)
    }
}

/// Derive the snapshot fields from daily bars, oldest first
///
/// Moving averages are only reported once enough bars exist for the full
/// window.
pub fn snapshot_from_bars(symbol: &str, bars: &[Bar]) -> Result<QuoteSnapshot> {
    let bars: Vec<Bar> = bars
        .iter()
        .copied()
        .filter(|b| b.close.is_finite() && b.close > 0.0)
        .collect();
    let (Some(first), Some(last)) = (bars.first(), bars.last()) else {
        return Err(StockError::not_found(symbol));
    };

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let high = bars.iter().map(|b| b.high).filter(|v| v.is_finite()).reduce(f64::max);
    let low = bars
        .iter()
        .map(|b| b.low)
        .filter(|v| v.is_finite() && *v > 0.0)
        .reduce(f64::min);

    let recent = &bars[bars.len().saturating_sub(AVG_VOLUME_SESSIONS)..];
    let avg_volume = recent.iter().map(|b| b.volume).sum::<u64>() / recent.len() as u64;

    Ok(QuoteSnapshot {
        current_price: Some(last.close),
        price_change_pct: Some((last.close / first.close - 1.0) * 100.0),
        fifty_day_ma: sma(&closes, 50)?,
        two_hundred_day_ma: sma(&closes, 200)?,
        fifty_two_week_high: high,
        fifty_two_week_low: low,
        volume: Some(last.volume),
        avg_volume: Some(avg_volume),
    })
}

fn sma(closes: &[f64], period: usize) -> Result<Option<f64>> {
    if closes.len() < period {
        return Ok(None);
    }
    let mut indicator =
        SimpleMovingAverage::new(period).map_err(|e| StockError::Indicator(e.to_string()))?;
    Ok(closes.iter().map(|&close| indicator.next(close)).last())
}
