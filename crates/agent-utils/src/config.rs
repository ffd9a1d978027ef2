//! Settings management
//!
//! Settings are read once at startup from an optional YAML file, then
//! overridden from the environment and validated. Everything downstream
//! receives the resolved values and never re-reads them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Default settings file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Errors raised while loading or validating settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file exists but could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        source: std::io::Error,
    },

    /// The settings file is not valid YAML for [`Settings`]
    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted field path, e.g. `llm.temperature`
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Root settings container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Language model settings shared by all agents
    pub llm: LlmSettings,
    /// Workflow behaviour
    pub agents: AgentSettings,
    /// Pinned prompt versions
    pub prompts: PromptSettings,
    /// Market data providers
    pub data: DataSettings,
}

/// Language model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name
    pub model: String,
    /// Sampling temperature, 0.0..=2.0
    pub temperature: f32,
    /// OpenAI-compatible endpoint; `None` means api.openai.com
    pub base_url: Option<String>,
    /// API key; falls back to `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// Maximum tokens in a response
    pub max_tokens: u32,
    /// HTTP timeout for one generation call
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            base_url: None,
            api_key: None,
            max_tokens: 1024,
            timeout_secs: 120,
        }
    }
}

/// How enabled analysis steps are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One task per enabled step, joined before synthesis
    #[default]
    Concurrent,
    /// Steps run one after another in canonical order
    Sequential,
}

/// Which router implementation picks the steps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterKind {
    /// Structured-output language model call
    #[default]
    Llm,
    /// Offline keyword matching
    Keyword,
}

/// Workflow behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// Log step reasoning and progress
    pub verbose: bool,
    /// Step scheduling
    pub execution: ExecutionMode,
    /// Always run the macro step, whatever the router says
    pub macro_always_on: bool,
    /// Router implementation
    pub router: RouterKind,
    /// Timeout for the routing call
    pub router_timeout_secs: u64,
    /// Timeout for each analysis step
    pub step_timeout_secs: u64,
    /// Timeout for the synthesis call
    pub synthesis_timeout_secs: u64,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            verbose: false,
            execution: ExecutionMode::Concurrent,
            macro_always_on: true,
            router: RouterKind::Llm,
            router_timeout_secs: 60,
            step_timeout_secs: 90,
            synthesis_timeout_secs: 90,
        }
    }
}

/// Prompt version pins keyed by prompt id (`router`, `technical_analyst`, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    /// Prompt id to semantic version
    pub versions: BTreeMap<String, String>,
}

/// Market data settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Alpha Vantage key for fundamentals; falls back to `ALPHA_VANTAGE_API_KEY`
    pub alpha_vantage_api_key: Option<String>,
    /// Headlines fetched for the news step
    pub news_limit: usize,
    /// Headlines fetched for the macro step's geopolitical search
    pub macro_news_limit: usize,
    /// HTTP timeout for data providers
    pub request_timeout_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: None,
            news_limit: 8,
            macro_news_limit: 5,
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    ///
    /// A missing file yields defaults; an empty file too.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loaded settings from {}", path.display());
        Self::from_yaml_str(&raw)
    }

    /// Parse settings from YAML text
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Load, apply process environment and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut settings = Self::from_yaml(path)?;
        settings.apply_env(|key| std::env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    /// Apply environment overrides through `lookup`
    ///
    /// File values win for credentials (env is only a fallback); `OPENAI_API_BASE`
    /// and `OPENAI_MODEL` override the file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.llm.api_key.is_none() {
            self.llm.api_key = lookup("OPENAI_API_KEY");
        }
        if let Some(base) = lookup("OPENAI_API_BASE") {
            self.llm.base_url = Some(base);
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            self.llm.model = model;
        }
        if self.data.alpha_vantage_api_key.is_none() {
            self.data.alpha_vantage_api_key = lookup("ALPHA_VANTAGE_API_KEY");
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid {
                field: "llm.temperature",
                reason: format!("{} is outside 0.0..=2.0", self.llm.temperature),
            });
        }
        if self.llm.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                field: "llm.max_tokens",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "llm.model",
                reason: "must not be empty".to_string(),
            });
        }
        if let Some(base) = &self.llm.base_url {
            url::Url::parse(base).map_err(|e| ConfigError::Invalid {
                field: "llm.base_url",
                reason: e.to_string(),
            })?;
        }

        let timeouts = [
            ("llm.timeout_secs", self.llm.timeout_secs),
            ("agents.router_timeout_secs", self.agents.router_timeout_secs),
            ("agents.step_timeout_secs", self.agents.step_timeout_secs),
            ("agents.synthesis_timeout_secs", self.agents.synthesis_timeout_secs),
            ("data.request_timeout_secs", self.data.request_timeout_secs),
        ];
        for (field, secs) in timeouts {
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "timeout must be at least 1 second".to_string(),
                });
            }
        }

        if self.data.news_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "data.news_limit",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
