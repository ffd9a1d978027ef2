//! CNN Fear & Greed index client

use crate::data::SentimentIndex;
use crate::error::{Result, StockError};
use crate::models::{FearGreed, fear_greed_label};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{instrument, warn};

const GRAPH_URL: &str = "https://production.dataviz.cnn.io/index/fearandgreed/graphdata";
const PROVIDER: &str = "CNN Fear & Greed";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct GraphData {
    fear_and_greed: Option<Reading>,
}

#[derive(Debug, Deserialize)]
struct Reading {
    score: Option<f64>,
    rating: Option<String>,
}

/// Client for CNN's public Fear & Greed endpoint
#[derive(Debug, Clone)]
pub struct CnnFearGreed {
    client: Client,
}

impl CnnFearGreed {
    /// Create a client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    async fn fetch(&self) -> Result<FearGreed> {
        let response = self
            .client
            .get(GRAPH_URL)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StockError::provider(
                PROVIDER,
                format!("HTTP error: {}", response.status()),
            ));
        }

        let data: GraphData = response.json().await?;
        Ok(parse_reading(data))
    }
}

fn parse_reading(data: GraphData) -> FearGreed {
    let Some(reading) = data.fear_and_greed else {
        return FearGreed::default();
    };
    let Some(score) = reading.score.filter(|s| s.is_finite()) else {
        return FearGreed::default();
    };

    let value = score.round().clamp(0.0, 100.0) as u8;
    // CNN reports lower-case ratings ("extreme fear")
    let label = reading
        .rating
        .filter(|r| !r.trim().is_empty())
        .map_or_else(|| fear_greed_label(value).to_string(), |r| title_case(&r));

    FearGreed {
        value: Some(value),
        label: Some(label),
    }
}

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl SentimentIndex for CnnFearGreed {
    #[instrument(skip(self))]
    async fn fear_greed(&self) -> FearGreed {
        match self.fetch().await {
            Ok(reading) => reading,
            Err(e) => {
                warn!(error = %e, "Fear & Greed unavailable");
                FearGreed::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn graph(value: serde_json::Value) -> GraphData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_provider_rating_is_used() {
        let reading = parse_reading(graph(json!({
            "fear_and_greed": {"score": 23.6, "rating": "extreme fear"}
        })));
        assert_eq!(reading.value, Some(24));
        assert_eq!(reading.label.as_deref(), Some("Extreme Fear"));
    }

    #[test]
    fn test_label_derived_when_rating_missing() {
        let reading = parse_reading(graph(json!({"fear_and_greed": {"score": 61.0}})));
        assert_eq!(reading.value, Some(61));
        assert_eq!(reading.label.as_deref(), Some("Greed"));
    }

    #[test]
    fn test_missing_score_degrades() {
        assert_eq!(parse_reading(graph(json!({}))), FearGreed::default());
        assert_eq!(
            parse_reading(graph(json!({"fear_and_greed": {"rating": "fear"}}))),
            FearGreed::default()
        );
    }
}
