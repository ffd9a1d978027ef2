//! Report assembly
//!
//! [`assemble`] is a pure function of its inputs: sections follow the
//! canonical step order whatever order the steps finished in, steps that were
//! never enabled produce nothing, and failed steps produce a visible marker.

use crate::state::{StepKind, StepResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Title of the synthesis section
pub const OUTLOOK_TITLE: &str = "AI Investment Outlook";

/// Report footer line
pub const FOOTER: &str = "*Generated by Multi-Agent Stock Analyzer*";

/// Body of one report section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum SectionBody {
    /// Analysis text
    Content(String),
    /// The step was enabled but failed; holds the reason
    Unavailable(String),
}

/// One named section of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    /// Section heading
    pub title: String,
    /// Step that produced it; `None` for the outlook
    pub step: Option<StepKind>,
    /// Section text or failure marker
    pub body: SectionBody,
}

impl ReportSection {
    /// Text rendered under the heading
    pub fn rendered_body(&self) -> String {
        match &self.body {
            SectionBody::Content(text) => text.trim().to_string(),
            SectionBody::Unavailable(reason) => format!("_Analysis unavailable: {reason}_"),
        }
    }

    /// Whether this is a failure marker
    pub fn is_unavailable(&self) -> bool {
        matches!(self.body, SectionBody::Unavailable(_))
    }
}

/// Terminal output of an invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalReport {
    /// Ticker named in the header
    pub ticker: String,
    /// Step sections in canonical order, then the outlook
    pub sections: Vec<ReportSection>,
}

impl FinalReport {
    /// Step sections only
    pub fn step_sections(&self) -> impl Iterator<Item = &ReportSection> {
        self.sections.iter().filter(|s| s.step.is_some())
    }

    /// The outlook section
    pub fn outlook(&self) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.step.is_none())
    }

    /// Render as markdown
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "# Stock Analysis Report: {}\n\n", self.ticker);
        for section in &self.sections {
            let _ = write!(out, "## {}\n\n{}\n\n", section.title, section.rendered_body());
        }
        out.push_str("---\n");
        out.push_str(FOOTER);
        out.push('\n');
        out
    }
}

/// Assemble the report from step results and the outlook
pub fn assemble(
    ticker: &str,
    results: &IndexMap<StepKind, StepResult>,
    outlook: &str,
) -> FinalReport {
    let mut sections: Vec<ReportSection> = StepKind::ALL
        .iter()
        .filter_map(|kind| results.get(kind))
        .map(|result| ReportSection {
            title: result.kind.title().to_string(),
            step: Some(result.kind),
            body: section_body(result),
        })
        .collect();

    sections.push(ReportSection {
        title: OUTLOOK_TITLE.to_string(),
        step: None,
        body: SectionBody::Content(outlook.to_string()),
    });

    FinalReport {
        ticker: ticker.to_string(),
        sections,
    }
}

fn section_body(result: &StepResult) -> SectionBody {
    if let Some(error) = &result.error {
        return SectionBody::Unavailable(error.to_string());
    }
    match result.usable_content() {
        Some(text) => SectionBody::Content(text.to_string()),
        None => SectionBody::Unavailable("no analysis was produced".to_string()),
    }
}
