//! Headline and sentiment analysis

use super::{AnalystModel, clean_snippet, into_step_result};
use crate::data::WebSearch;
use crate::error::{Result, StockError};
use crate::models::SearchHit;
use agent_prompt::PromptId;
use agent_workflow::{StepExecutor, StepKind, StepResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

const SNIPPET_CHARS: usize = 280;

/// Headline with "(source, date)" appended when known
pub(crate) fn decorate_headline(hit: &SearchHit) -> String {
    let meta: Vec<&str> = [hit.source.as_deref(), hit.published.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if meta.is_empty() {
        hit.headline.clone()
    } else {
        format!("{} ({})", hit.headline, meta.join(", "))
    }
}

/// News analysis step
pub struct NewsAnalyst {
    search: Arc<dyn WebSearch>,
    model: AnalystModel,
    limit: usize,
}

impl NewsAnalyst {
    /// Create the step, reading up to `limit` articles
    pub fn new(search: Arc<dyn WebSearch>, model: AnalystModel, limit: usize) -> Self {
        Self {
            search,
            model,
            limit,
        }
    }

    async fn analyze(&self, ticker: &str) -> Result<String> {
        let query = format!("{ticker} stock news");
        let hits = self.search.search(&query, self.limit).await?;
        debug!(hits = hits.len(), %query, "News search finished");
        if hits.is_empty() {
            return Err(StockError::NoNews(ticker.to_string()));
        }

        let facts = news_facts(&query, &hits);
        self.model
            .analyze(StepKind::News, PromptId::NewsAnalyst, ticker, &facts)
            .await
    }
}

#[async_trait]
impl StepExecutor for NewsAnalyst {
    fn kind(&self) -> StepKind {
        StepKind::News
    }

    #[instrument(name = "news_step", skip(self))]
    async fn run(&self, ticker: &str) -> StepResult {
        into_step_result(StepKind::News, self.analyze(ticker).await)
    }
}

/// Facts block for the news prompt
pub(crate) fn news_facts(query: &str, hits: &[SearchHit]) -> String {
    let mut out = format!("### News search: \"{query}\"\n\nHeadlines:\n");
    for (i, hit) in hits.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, decorate_headline(hit)));
    }

    let snippets: Vec<String> = hits
        .iter()
        .map(|hit| clean_snippet(&hit.snippet, SNIPPET_CHARS))
        .filter(|s| !s.is_empty())
        .collect();
    out.push_str("\nSnippets:\n");
    if snippets.is_empty() {
        out.push_str("- Not available\n");
    }
    for snippet in snippets {
        out.push_str(&format!("- {snippet}\n"));
    }
    out
}
