//! Yahoo Finance search endpoint used as a news search

use crate::data::WebSearch;
use crate::error::{Result, StockError};
use crate::models::SearchHit;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const PROVIDER: &str = "Yahoo search";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    provider_publish_time: Option<i64>,
}

impl From<NewsItem> for SearchHit {
    fn from(item: NewsItem) -> Self {
        Self {
            headline: item.title.trim().to_string(),
            snippet: item.summary.unwrap_or_default().trim().to_string(),
            source: item.publisher.filter(|p| !p.trim().is_empty()),
            published: item
                .provider_publish_time
                .and_then(|ts| DateTime::from_timestamp(ts, 0))
                .map(|dt| dt.format("%Y-%m-%d").to_string()),
        }
    }
}

/// News search backed by Yahoo Finance
#[derive(Debug, Clone)]
pub struct YahooNewsSearch {
    client: Client,
}

impl YahooNewsSearch {
    /// Create a search client with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl WebSearch for YahooNewsSearch {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let count = limit.to_string();
        let params = [
            ("q", query),
            ("newsCount", count.as_str()),
            ("quotesCount", "0"),
        ];
        let response = self.client.get(SEARCH_URL).query(&params).send().await?;

        if !response.status().is_success() {
            return Err(StockError::provider(
                PROVIDER,
                format!("HTTP error: {}", response.status()),
            ));
        }

        let body: SearchResponse = response.json().await?;
        let hits = parse_hits(body, limit);
        debug!(hits = hits.len(), "News search finished");
        Ok(hits)
    }
}

fn parse_hits(body: SearchResponse, limit: usize) -> Vec<SearchHit> {
    body.news
        .into_iter()
        .map(SearchHit::from)
        .filter(|hit| !hit.headline.is_empty())
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_hits() {
        let body: SearchResponse = serde_json::from_value(json!({
            "news": [
                {
                    "title": " Apple beats estimates ",
                    "publisher": "Reuters",
                    "providerPublishTime": 1_700_000_000,
                    "link": "https://example.com/a"
                },
                { "title": "", "publisher": "Nobody" },
                { "title": "Second", "summary": "Body text" }
            ]
        }))
        .unwrap();

        let hits = parse_hits(body, 8);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].headline, "Apple beats estimates");
        assert_eq!(hits[0].source.as_deref(), Some("Reuters"));
        assert_eq!(hits[0].published.as_deref(), Some("2023-11-14"));
        assert_eq!(hits[0].snippet, "");
        assert_eq!(hits[1].snippet, "Body text");
    }

    #[test]
    fn test_missing_news_is_empty() {
        let body: SearchResponse = serde_json::from_value(json!({"quotes": []})).unwrap();
        assert!(parse_hits(body, 5).is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_search() {
        let search = YahooNewsSearch::new(Duration::from_secs(30)).unwrap();
        let hits = search.search("AAPL stock news", 5).await.unwrap();
        assert!(hits.len() <= 5);
    }
}
