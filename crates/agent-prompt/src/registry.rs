//! Versioned prompt registry
//!
//! Every prompt id owns a set of semantic versions. The registry resolves a
//! request to an explicit version, else the pinned version, else the latest
//! one, and renders it.

use crate::{PromptError, PromptId, Result, catalog, jinja};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// A versioned prompt definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptSpec {
    /// Which prompt this is
    pub id: PromptId,
    /// Semantic version, e.g. "1.1.0"
    pub version: &'static str,
    /// Template text
    pub text: &'static str,
}

impl PromptSpec {
    /// Create a prompt spec
    pub const fn new(id: PromptId, version: &'static str, text: &'static str) -> Self {
        Self { id, version, text }
    }

    /// Render this prompt with `vars`
    pub fn render(&self, vars: &impl Serialize) -> Result<String> {
        jinja::render(self.id.key(), self.version, self.text, vars)
    }
}

/// Parse "MAJOR.MINOR.PATCH" for ordering; malformed parts sort first
fn version_key(version: &str) -> (u32, u32, u32) {
    let mut parts = version.split('.').map(|p| p.parse::<u32>().unwrap_or(0));
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

/// Immutable lookup of prompt versions plus active pins
///
/// # Examples
///
/// ```
/// use agent_prompt::{PromptId, PromptRegistry};
/// use std::collections::BTreeMap;
///
/// let pins = BTreeMap::from([("router".to_string(), "1.0.0".to_string())]);
/// let registry = PromptRegistry::builtin().with_pins(&pins).unwrap();
///
/// assert_eq!(registry.spec(PromptId::Router, None).unwrap().version, "1.0.0");
/// assert_eq!(registry.spec(PromptId::MacroAnalyst, None).unwrap().version, "1.0.0");
/// ```
#[derive(Debug, Clone)]
pub struct PromptRegistry {
    specs: HashMap<PromptId, BTreeMap<(u32, u32, u32), PromptSpec>>,
    pins: HashMap<PromptId, String>,
}

impl PromptRegistry {
    /// Create a registry from explicit specs, without pins
    pub fn new(specs: impl IntoIterator<Item = PromptSpec>) -> Self {
        let mut by_id: HashMap<PromptId, BTreeMap<(u32, u32, u32), PromptSpec>> = HashMap::new();
        for spec in specs {
            by_id
                .entry(spec.id)
                .or_default()
                .insert(version_key(spec.version), spec);
        }
        Self {
            specs: by_id,
            pins: HashMap::new(),
        }
    }

    /// Registry holding the built-in catalog
    pub fn builtin() -> Self {
        Self::new(catalog::builtin())
    }

    /// Pin versions from a `prompt id -> version` map
    ///
    /// Unknown ids and versions are rejected here so a bad pin fails at
    /// startup instead of mid-analysis.
    pub fn with_pins(mut self, pins: &BTreeMap<String, String>) -> Result<Self> {
        for (key, version) in pins {
            let id: PromptId = key.parse()?;
            self.lookup(id, version)?;
            debug!(prompt = %id, version = %version, "Pinned prompt version");
            self.pins.insert(id, version.clone());
        }
        Ok(self)
    }

    fn lookup(&self, id: PromptId, version: &str) -> Result<&PromptSpec> {
        let versions = self
            .specs
            .get(&id)
            .ok_or_else(|| PromptError::UnknownPrompt(id.key().to_string()))?;

        versions
            .values()
            .find(|spec| spec.version == version)
            .ok_or_else(|| PromptError::UnknownVersion {
                id: id.key().to_string(),
                version: version.to_string(),
                available: versions
                    .values()
                    .map(|s| s.version)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    /// Resolve a prompt: explicit `version`, else the pin, else the latest
    pub fn spec(&self, id: PromptId, version: Option<&str>) -> Result<&PromptSpec> {
        if let Some(version) = version.or(self.pins.get(&id).map(String::as_str)) {
            return self.lookup(id, version);
        }

        self.specs
            .get(&id)
            .and_then(|versions| versions.values().next_back())
            .ok_or_else(|| PromptError::UnknownPrompt(id.key().to_string()))
    }

    /// Render the active version of `id`
    pub fn render(&self, id: PromptId, vars: &impl Serialize) -> Result<String> {
        self.spec(id, None)?.render(vars)
    }

    /// Available versions of `id`, oldest first
    pub fn versions(&self, id: PromptId) -> Vec<&'static str> {
        self.specs
            .get(&id)
            .map(|v| v.values().map(|s| s.version).collect())
            .unwrap_or_default()
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_prompt_has_a_version() {
        let registry = PromptRegistry::builtin();
        for id in PromptId::ALL {
            assert!(registry.spec(id, None).is_ok(), "{id} missing");
        }
    }

    #[test]
    fn test_latest_when_unpinned() {
        let registry = PromptRegistry::builtin();
        assert_eq!(registry.spec(PromptId::Router, None).unwrap().version, "1.0.1");
        assert_eq!(
            registry.spec(PromptId::TechnicalAnalyst, None).unwrap().version,
            "1.1.1"
        );
        assert_eq!(
            registry.versions(PromptId::NewsAnalyst),
            vec!["1.0.0", "1.1.0", "1.1.1"]
        );
    }

    #[test]
    fn test_explicit_version_beats_pin() {
        let pins = BTreeMap::from([("technical_analyst".to_string(), "1.1.0".to_string())]);
        let registry = PromptRegistry::builtin().with_pins(&pins).unwrap();

        let pinned = registry.spec(PromptId::TechnicalAnalyst, None).unwrap();
        assert_eq!(pinned.version, "1.1.0");

        let explicit = registry
            .spec(PromptId::TechnicalAnalyst, Some("1.0.0"))
            .unwrap();
        assert!(explicit.text.contains("Short-term price outlook"));
    }

    #[test]
    fn test_unknown_pin_rejected() {
        let pins = BTreeMap::from([("router".to_string(), "9.9.9".to_string())]);
        let err = PromptRegistry::builtin().with_pins(&pins).unwrap_err();
        match err {
            PromptError::UnknownVersion { available, .. } => {
                assert_eq!(available, "1.0.0, 1.0.1");
            }
            other => panic!("unexpected error: {other}"),
        }

        let pins = BTreeMap::from([("trader".to_string(), "1.0.0".to_string())]);
        assert!(matches!(
            PromptRegistry::builtin().with_pins(&pins),
            Err(PromptError::UnknownPrompt(_))
        ));
    }

    #[test]
    fn test_render_investment_prompt() {
        let registry = PromptRegistry::builtin();
        let prompt = registry
            .render(
                PromptId::InvestmentAnalyst,
                &json!({
                    "ticker": "NVDA",
                    "technical_analysis": "Uptrend",
                    "fundamental_analysis": "Not available",
                    "news_analysis": "Not available",
                    "macro_analysis": "Risk-on",
                }),
            )
            .unwrap();

        assert!(prompt.contains("Stock Ticker: NVDA"));
        assert!(prompt.contains("Technical Analysis:\nUptrend"));
        assert!(prompt.contains("Fundamental Analysis:\nNot available"));
        assert!(prompt.contains("**Recommendation:**"));
    }

    #[test]
    fn test_version_ordering() {
        assert!(version_key("1.10.0") > version_key("1.9.3"));
        assert_eq!(version_key("2"), (2, 0, 0));
    }
}
