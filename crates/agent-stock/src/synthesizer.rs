//! Investment outlook synthesis

use crate::executors::AnalystModel;
use crate::models::NOT_AVAILABLE;
use agent_prompt::PromptId;
use agent_workflow::{StepKind, StepResult, SynthesisFailure, Synthesizer};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::instrument;

/// Variables of the investment analyst template
#[derive(Debug, Serialize)]
struct OutlookInputs<'a> {
    ticker: &'a str,
    technical_analysis: &'a str,
    fundamental_analysis: &'a str,
    news_analysis: &'a str,
    macro_analysis: &'a str,
}

impl<'a> OutlookInputs<'a> {
    fn new(ticker: &'a str, results: &'a IndexMap<StepKind, StepResult>) -> Self {
        let content = |kind: StepKind| {
            results
                .get(&kind)
                .and_then(StepResult::usable_content)
                .unwrap_or(NOT_AVAILABLE)
        };
        Self {
            ticker,
            technical_analysis: content(StepKind::Technical),
            fundamental_analysis: content(StepKind::Fundamental),
            news_analysis: content(StepKind::News),
            macro_analysis: content(StepKind::Macro),
        }
    }
}

/// Synthesizer backed by the investment analyst prompt
pub struct LlmSynthesizer {
    model: AnalystModel,
}

impl LlmSynthesizer {
    /// Create a synthesizer
    pub fn new(model: AnalystModel) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    #[instrument(name = "synthesize", skip(self, results), fields(inputs = results.len()))]
    async fn synthesize(
        &self,
        ticker: &str,
        results: &IndexMap<StepKind, StepResult>,
    ) -> Result<String, SynthesisFailure> {
        let inputs = OutlookInputs::new(ticker, results);
        let system = self
            .model
            .prompts()
            .render(PromptId::InvestmentAnalyst, &inputs)
            .map_err(|e| SynthesisFailure::Generation(e.to_string()))?;
        let user = format!("Generate an investment outlook for {ticker} based on the analysis above.");

        self.model
            .generator()
            .generate(&system, &user)
            .await
            .map_err(|e| SynthesisFailure::Generation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executors::testing;
    use agent_workflow::StepError;

    #[test]
    fn test_missing_and_failed_inputs_are_not_available() {
        let mut results = IndexMap::new();
        results.insert(
            StepKind::Technical,
            StepResult::success(StepKind::Technical, "Uptrend intact."),
        );
        results.insert(
            StepKind::News,
            StepResult::failure(StepKind::News, StepError::data("no news found for AAPL")),
        );

        let inputs = OutlookInputs::new("AAPL", &results);
        assert_eq!(inputs.technical_analysis, "Uptrend intact.");
        assert_eq!(inputs.fundamental_analysis, NOT_AVAILABLE);
        assert_eq!(inputs.news_analysis, NOT_AVAILABLE);
        assert_eq!(inputs.macro_analysis, NOT_AVAILABLE);
    }

    #[tokio::test]
    async fn test_synthesize_empty_results() {
        let (model, provider) = testing::model(Some("**Recommendation:** HOLD (Low Confidence)"));
        let synthesizer = LlmSynthesizer::new(model);

        let outlook = synthesizer.synthesize("AAPL", &IndexMap::new()).await.unwrap();

        assert!(outlook.contains("HOLD"));
        assert_eq!(
            provider.seen.lock().unwrap()[0],
            "Generate an investment outlook for AAPL based on the analysis above."
        );
    }

    #[tokio::test]
    async fn test_generation_failure() {
        let (model, _) = testing::model(None);
        let err = LlmSynthesizer::new(model)
            .synthesize("AAPL", &IndexMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, SynthesisFailure::Generation(_)));
    }
}
