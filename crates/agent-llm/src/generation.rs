//! Text generation on top of an [`LLMProvider`]
//!
//! [`TextGenerator`] binds a provider to the model parameters resolved at
//! startup and exposes the two calls the analysis pipeline needs: free text
//! and schema-constrained JSON.

use crate::{CompletionRequest, LLMError, LLMProvider, Message, Result, StopReason, schema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Model parameters shared by every generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum output tokens
    pub max_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 1024,
        }
    }
}

/// Provider handle plus fixed model parameters
#[derive(Clone)]
pub struct TextGenerator {
    provider: Arc<dyn LLMProvider>,
    params: GenerationParams,
}

impl TextGenerator {
    /// Create a generator
    pub fn new(provider: Arc<dyn LLMProvider>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    /// Model parameters in use
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    fn request(&self, system: &str, user: &str) -> crate::completion::CompletionRequestBuilder {
        CompletionRequest::builder(&self.params.model)
            .system(system)
            .add_message(Message::user(user))
            .max_tokens(self.params.max_tokens)
            .temperature(self.params.temperature)
    }

    /// Generate free text
    ///
    /// An empty completion is an error: callers always expect prose back.
    pub async fn generate(&self, system: &str, user: &str) -> Result<String> {
        let response = self.provider.complete(self.request(system, user).build()).await?;

        if response.stop_reason == StopReason::MaxTokens {
            warn!(
                provider = self.provider.name(),
                "Completion truncated at {} tokens", self.params.max_tokens
            );
        }

        response
            .message
            .text()
            .map(str::to_string)
            .ok_or_else(|| LLMError::UnexpectedResponse("empty completion".to_string()))
    }

    /// Generate a JSON value conforming to `schema` and deserialize it
    ///
    /// Fails closed: output that is not JSON, does not match the schema, or
    /// does not deserialize into `T` is a [`LLMError::MalformedOutput`].
    pub async fn generate_structured<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
        name: &str,
        schema: Value,
    ) -> Result<T> {
        let request = self
            .request(system, user)
            .json_schema(name, schema.clone())
            .build();
        let response = self.provider.complete(request).await?;
        debug!(schema = name, "Structured completion received");

        let value = parse_json_content(&response.message.content)?;
        schema::conforms(&schema, &value).map_err(LLMError::MalformedOutput)?;
        serde_json::from_value(value).map_err(|e| LLMError::MalformedOutput(e.to_string()))
    }
}

/// Parse model output as JSON, unwrapping a markdown code fence if present
pub fn parse_json_content(content: &str) -> Result<Value> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    if body.is_empty() {
        return Err(LLMError::MalformedOutput("empty completion".to_string()));
    }
    serde_json::from_str(body).map_err(|e| LLMError::MalformedOutput(format!("not JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompletionResponse, TokenUsage};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    struct ScriptedProvider {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(CompletionResponse {
                message: Message::assistant(self.reply.clone()),
                stop_reason: StopReason::EndTurn,
                usage: TokenUsage::default(),
            })
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    #[derive(Debug, Deserialize)]
    struct Pick {
        ticker: String,
    }

    fn pick_schema() -> Value {
        schema::object(json!({"ticker": schema::string("t")}), vec!["ticker"])
    }

    #[tokio::test]
    async fn test_generate_passes_params() {
        let provider = ScriptedProvider::new("  Bullish momentum.  ");
        let generator = TextGenerator::new(provider.clone(), GenerationParams::default());

        let text = generator.generate("sys", "user").await.unwrap();
        assert_eq!(text, "Bullish momentum.");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(seen[0].model, "gpt-4o-mini");
        assert_eq!(seen[0].temperature, Some(0.2));
        assert_eq!(seen[0].system.as_deref(), Some("sys"));
        assert!(seen[0].response_format.is_none());
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_text() {
        let generator = TextGenerator::new(ScriptedProvider::new(""), GenerationParams::default());
        assert!(matches!(
            generator.generate("s", "u").await,
            Err(LLMError::UnexpectedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_structured_output_from_fenced_json() {
        let provider = ScriptedProvider::new("```json\n{\"ticker\": \"AAPL\"}\n```");
        let generator = TextGenerator::new(provider.clone(), GenerationParams::default());

        let pick: Pick = generator
            .generate_structured("s", "u", "pick", pick_schema())
            .await
            .unwrap();
        assert_eq!(pick.ticker, "AAPL");
        assert!(provider.seen.lock().unwrap()[0].response_format.is_some());
    }

    #[tokio::test]
    async fn test_structured_output_fails_closed() {
        let generator = TextGenerator::new(
            ScriptedProvider::new("AAPL looks good"),
            GenerationParams::default(),
        );
        let result: Result<Pick> = generator
            .generate_structured("s", "u", "pick", pick_schema())
            .await;
        assert!(matches!(result, Err(LLMError::MalformedOutput(_))));

        let generator = TextGenerator::new(
            ScriptedProvider::new("{\"symbol\": \"AAPL\"}"),
            GenerationParams::default(),
        );
        let result: Result<Pick> = generator
            .generate_structured("s", "u", "pick", pick_schema())
            .await;
        assert!(matches!(result, Err(LLMError::MalformedOutput(_))));
    }
}
