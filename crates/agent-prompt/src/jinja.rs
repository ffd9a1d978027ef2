//! MiniJinja rendering for prompt templates

use crate::{PromptError, Result};
use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

/// Render `template` with `vars`
///
/// Undefined variables are errors so a missing section can never render as
/// an empty string.
pub(crate) fn render(id: &str, version: &str, template: &str, vars: &impl Serialize) -> Result<String> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);

    let value = minijinja::Value::from_serialize(vars);
    env.render_str(template, value)
        .map_err(|e| PromptError::RenderError {
            id: id.to_string(),
            version: version.to_string(),
            detail: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_variables() {
        let out = render("t", "1.0.0", "Ticker: {{ ticker }}\n", &json!({"ticker": "NVDA"})).unwrap();
        assert_eq!(out, "Ticker: NVDA\n");
    }

    #[test]
    fn test_missing_variable_is_error() {
        let err = render("t", "1.0.0", "{{ ticker }}", &json!({})).unwrap_err();
        assert!(matches!(err, PromptError::RenderError { .. }));
    }

    #[test]
    fn test_html_is_not_escaped() {
        let out = render("t", "1.0.0", "{{ body }}", &json!({"body": "P/E < 20 & rising"})).unwrap();
        assert_eq!(out, "P/E < 20 & rising");
    }
}
