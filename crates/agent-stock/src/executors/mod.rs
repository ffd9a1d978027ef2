//! The four analysis steps
//!
//! Each executor gathers facts from its data capabilities, renders them into a
//! plain-text facts block, and asks the model for an analysis under its
//! analyst prompt. Failures are folded into the returned
//! [`StepResult`](agent_workflow::StepResult).

mod fundamental;
mod macro_context;
mod news;
mod technical;

pub use fundamental::FundamentalAnalyst;
pub use macro_context::{GEOPOLITICAL_QUERY, MacroAnalyst};
pub use news::NewsAnalyst;
pub use technical::TechnicalAnalyst;

use crate::error::Result;
use agent_llm::TextGenerator;
use agent_prompt::{PromptId, PromptRegistry};
use agent_workflow::{StepKind, StepResult};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Model access shared by the analysts
#[derive(Clone)]
pub struct AnalystModel {
    generator: TextGenerator,
    prompts: Arc<PromptRegistry>,
    verbose: bool,
}

impl AnalystModel {
    /// Bind a generator to the prompt registry
    pub fn new(generator: TextGenerator, prompts: Arc<PromptRegistry>) -> Self {
        Self {
            generator,
            prompts,
            verbose: false,
        }
    }

    /// Log each step's facts and analysis at info level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub(crate) fn generator(&self) -> &TextGenerator {
        &self.generator
    }

    pub(crate) fn prompts(&self) -> &PromptRegistry {
        &self.prompts
    }

    /// Ask the `prompt` analyst to interpret `facts` about `ticker`
    pub(crate) async fn analyze(
        &self,
        kind: StepKind,
        prompt: PromptId,
        ticker: &str,
        facts: &str,
    ) -> Result<String> {
        let system = self.prompts.render(prompt, &json!({}))?;
        let user = format!(
            "Analyze {ticker}. Use only the data below; values marked \"Not available\" are missing.\n\n{facts}"
        );

        if self.verbose {
            info!(step = %kind, %ticker, "Facts gathered:\n{facts}");
        }
        let analysis = self.generator.generate(&system, &user).await?;
        if self.verbose {
            info!(step = %kind, %ticker, "Analysis:\n{analysis}");
        }
        Ok(analysis)
    }
}

/// Fold an analysis outcome into a step result
pub(crate) fn into_step_result(kind: StepKind, outcome: Result<String>) -> StepResult {
    match outcome {
        Ok(content) => StepResult::success(kind, content),
        Err(e) => StepResult::failure(kind, e.into()),
    }
}

/// Collapse whitespace and cut to `max_chars` characters
pub(crate) fn clean_snippet(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(max_chars).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_snippet() {
        assert_eq!(clean_snippet("  a\n\n b\tc  ", 280), "a b c");
        assert_eq!(clean_snippet("abcdef", 3), "abc");
        assert_eq!(clean_snippet("ééé", 2), "éé");
    }
}
