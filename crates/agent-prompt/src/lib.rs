//! Versioned prompt registry for think-once
//!
//! Prompts live in code with explicit semantic versions. The active version
//! of each prompt is pinned in settings (`prompts.versions`), and rendering
//! goes through MiniJinja so templates can take variables.
//!
//! ```
//! use agent_prompt::{PromptId, PromptRegistry};
//! use serde_json::json;
//!
//! let registry = PromptRegistry::builtin();
//! let system = registry.render(PromptId::TechnicalAnalyst, &json!({})).unwrap();
//! assert!(system.contains("Technical Analyst"));
//! ```

mod catalog;
pub mod error;
pub mod id;
mod jinja;
pub mod registry;

pub use error::{PromptError, Result};
pub use id::PromptId;
pub use registry::{PromptRegistry, PromptSpec};
