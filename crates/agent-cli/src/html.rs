//! Standalone HTML export of a report
//!
//! One collapsible card per section, a recommendation badge taken from the
//! parsed outlook, inline CSS so the file opens anywhere.

use agent_workflow::{FinalReport, InvestmentSummary, ReportSection, StepKind};
use anyhow::Context;
use chrono::NaiveDateTime;
use minijinja::{Environment, context};
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const TEMPLATE_NAME: &str = "report.html";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Stock Analysis Report - {{ ticker }}</title>
<style>
  :root { --ink: #1d1d1f; --muted: #6e6e73; --line: #d2d2d7; --paper: #f5f5f7; --accent: #0071e3; }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; background: var(--paper);
         color: var(--ink); line-height: 1.5; padding: 48px 20px; }
  .report { max-width: 960px; margin: 0 auto; background: #fff; border-radius: 18px;
            box-shadow: 0 4px 24px rgba(0, 0, 0, .08); overflow: hidden; }
  header { background: var(--ink); color: #fff; text-align: center; padding: 56px 32px 40px; }
  header h1 { font-size: 1.4rem; font-weight: 400; color: #a1a1a6; margin-bottom: 20px; }
  .ticker { display: inline-block; background: var(--accent); border-radius: 980px; padding: 10px 28px;
            font-size: 1.5rem; font-weight: 600; }
  .meta { margin-top: 20px; color: #a1a1a6; font-size: .875rem; }
  main { padding: 40px; }
  .controls { display: flex; justify-content: flex-end; gap: 8px; margin-bottom: 20px; }
  .controls button { background: none; border: 0; color: var(--accent); cursor: pointer; font: inherit;
                     padding: 8px 16px; border-radius: 980px; }
  .controls button:hover { background: rgba(0, 113, 227, .1); }
  .summary { display: flex; justify-content: center; align-items: center; gap: 16px; margin-bottom: 28px;
             font-size: 1.2rem; font-weight: 600; }
  .badge { display: inline-block; border-radius: 980px; padding: 6px 18px; font-weight: 600;
           text-transform: uppercase; letter-spacing: .02em; }
  .badge.buy { background: rgba(52, 199, 89, .12); color: #248a3d; }
  .badge.hold { background: rgba(255, 149, 0, .12); color: #c93400; }
  .badge.sell { background: rgba(255, 59, 48, .12); color: #d70015; }
  .card { border-radius: 18px; box-shadow: 0 2px 12px rgba(0, 0, 0, .05); margin-bottom: 16px; overflow: hidden; }
  .card-header { display: flex; align-items: center; gap: 14px; padding: 20px 24px; cursor: pointer;
                 border-bottom: 1px solid var(--line); user-select: none; }
  .card-header:hover { background: var(--paper); }
  .icon { width: 40px; height: 40px; border-radius: 12px; display: flex; align-items: center;
          justify-content: center; font-size: 1.25rem; }
  .icon.technical { background: linear-gradient(135deg, #5e5ce6, #bf5af2); }
  .icon.fundamental { background: linear-gradient(135deg, #30d158, #34c759); }
  .icon.news { background: linear-gradient(135deg, #ff9f0a, #ff9500); }
  .icon.macro { background: linear-gradient(135deg, #64d2ff, #5ac8fa); }
  .icon.outlook { background: linear-gradient(135deg, #0a84ff, #0071e3); }
  .card-header h2 { font-size: 1.15rem; font-weight: 600; }
  .chevron { margin-left: auto; color: var(--muted); transition: transform .3s; }
  .card.collapsed .chevron { transform: rotate(-90deg); }
  .card.collapsed .card-body { display: none; }
  .card-body { padding: 24px; }
  .card-body p { margin-bottom: 14px; }
  .card-body ul, .card-body ol { margin: 12px 0; padding-left: 24px; }
  .card-body li { margin-bottom: 8px; }
  .card-body h3 { font-size: 1.05rem; margin: 24px 0 12px; padding-bottom: 8px; border-bottom: 1px solid var(--line); }
  .card-body h3:first-child { margin-top: 0; }
  .unavailable { color: var(--muted); font-style: italic; }
  footer { text-align: center; padding: 28px; background: var(--paper); color: var(--muted); font-size: .875rem; }
</style>
</head>
<body>
<article class="report">
  <header>
    <h1>Stock Analysis Report</h1>
    <div class="ticker">{{ ticker }}</div>
    <div class="meta">{{ date }} &middot; {{ time }}</div>
  </header>
  <main>
    <div class="controls">
      <button onclick="setAll(false)">Expand All</button>
      <button onclick="setAll(true)">Collapse All</button>
    </div>
    {% if badge != "na" %}
    <div class="summary">
      <span>Recommendation:</span>
      <span class="badge {{ badge }}">{{ recommendation }}</span>
      {% if confidence != "N/A" %}<span>({{ confidence }} Confidence)</span>{% endif %}
    </div>
    {% endif %}
    {% for section in sections %}
    <section class="card{% if loop.index > 1 %} collapsed{% endif %}">
      <div class="card-header" onclick="this.parentElement.classList.toggle('collapsed')">
        <div class="icon {{ section.icon_class }}">{{ section.icon }}</div>
        <h2>{{ section.title }}</h2>
        <span class="chevron">&#9660;</span>
      </div>
      <div class="card-body">
        {% if section.unavailable %}<p class="unavailable">{{ section.reason }}</p>{% else %}{{ section.body|safe }}{% endif %}
      </div>
    </section>
    {% endfor %}
  </main>
  <footer>Generated by <strong>Multi-Agent Stock Analyzer</strong></footer>
</article>
<script>
  function setAll(collapsed) {
    document.querySelectorAll('.card').forEach(c => c.classList.toggle('collapsed', collapsed));
  }
</script>
</body>
</html>
"#;

static BOLD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").ok());
static ITALIC: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\*([^*\s][^*]*?)\*|\b_([^_]+?)_\b").ok());
static NUMBERED: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^\d+\.\s+").ok());
static RECOMMENDATION: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?i)<strong>Recommendation:?</strong>:?\s*(BUY|HOLD|SELL)\b").ok()
});

#[derive(Debug, Serialize)]
struct SectionView {
    title: String,
    icon: &'static str,
    icon_class: &'static str,
    unavailable: bool,
    reason: String,
    body: String,
}

impl SectionView {
    fn new(section: &ReportSection) -> Self {
        let (icon, icon_class) = match section.step {
            Some(StepKind::Technical) => ("📈", "technical"),
            Some(StepKind::Fundamental) => ("📊", "fundamental"),
            Some(StepKind::News) => ("📰", "news"),
            Some(StepKind::Macro) => ("🌍", "macro"),
            None => ("🎯", "outlook"),
        };
        let unavailable = section.is_unavailable();
        Self {
            title: section.title.clone(),
            icon,
            icon_class,
            unavailable,
            reason: if unavailable {
                section.rendered_body().trim_matches('_').to_string()
            } else {
                String::new()
            },
            body: if unavailable {
                String::new()
            } else {
                markdown_to_html(&section.rendered_body())
            },
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn inline(text: &str) -> String {
    let mut out = escape(text);
    if let Some(re) = BOLD.as_ref() {
        out = re
            .replace_all(&out, |caps: &regex::Captures<'_>| {
                let inner = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                format!("<strong>{inner}</strong>")
            })
            .into_owned();
    }
    if let Some(re) = ITALIC.as_ref() {
        out = re
            .replace_all(&out, |caps: &regex::Captures<'_>| {
                let inner = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
                format!("<em>{inner}</em>")
            })
            .into_owned();
    }
    if let Some(re) = RECOMMENDATION.as_ref() {
        out = re
            .replace_all(&out, |caps: &regex::Captures<'_>| {
                let call = caps[1].to_uppercase();
                format!(
                    "<strong>Recommendation:</strong> <span class=\"badge {}\">{call}</span>",
                    call.to_lowercase()
                )
            })
            .into_owned();
    }
    out
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum List {
    Bullet,
    Numbered,
}

impl List {
    fn close(self) -> &'static str {
        match self {
            Self::Bullet => "</ul>",
            Self::Numbered => "</ol>",
        }
    }
}

/// Convert the markdown subset the analysts write into HTML
///
/// Handles bold, italics, `-`/`*` bullets, numbered lists and `###`
/// subheadings; every other non-empty line becomes a paragraph.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut open: Option<List> = None;

    for line in markdown.lines().map(str::trim) {
        let numbered = NUMBERED.as_ref().and_then(|re| re.find(line));
        let item = match (line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")), numbered) {
            (Some(rest), _) => Some((List::Bullet, rest)),
            (None, Some(m)) => Some((List::Numbered, &line[m.end()..])),
            (None, None) => None,
        };

        if let Some((kind, text)) = item {
            if open != Some(kind) {
                if let Some(previous) = open {
                    out.push(previous.close().to_string());
                }
                out.push(if kind == List::Bullet { "<ul>" } else { "<ol>" }.to_string());
                open = Some(kind);
            }
            out.push(format!("<li>{}</li>", inline(text)));
            continue;
        }

        if let Some(previous) = open.take() {
            out.push(previous.close().to_string());
        }
        if let Some(heading) = line
            .strip_prefix("### ")
            .or_else(|| line.strip_prefix("## "))
        {
            out.push(format!("<h3>{}</h3>", inline(heading)));
        } else if !line.is_empty() {
            out.push(format!("<p>{}</p>", inline(line)));
        }
    }
    if let Some(previous) = open {
        out.push(previous.close().to_string());
    }
    out.join("\n")
}

/// Render the report as a standalone HTML page
pub fn render(
    report: &FinalReport,
    summary: &InvestmentSummary,
    generated: NaiveDateTime,
) -> anyhow::Result<String> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;
    let template = env.get_template(TEMPLATE_NAME)?;

    let sections: Vec<SectionView> = report.sections.iter().map(SectionView::new).collect();
    let html = template.render(context! {
        ticker => report.ticker,
        date => generated.format("%B %d, %Y").to_string(),
        time => generated.format("%H:%M").to_string(),
        badge => summary.badge(),
        recommendation => summary.recommendation,
        confidence => summary.confidence,
        sections => sections,
    })?;
    Ok(html)
}

/// File name for a report generated at `generated`
pub fn file_name(ticker: &str, generated: NaiveDateTime) -> String {
    format!(
        "{ticker}_analysis_{}.html",
        generated.format("%Y-%m-%d_%H%M%S")
    )
}

/// Write the HTML report into `dir`, creating it if needed
pub fn save(
    dir: &Path,
    report: &FinalReport,
    summary: &InvestmentSummary,
    generated: NaiveDateTime,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating report directory {}", dir.display()))?;
    let path = dir.join(file_name(&report.ticker, generated));
    let html = render(report, summary, generated)?;
    std::fs::write(&path, html).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_workflow::{SectionBody, StepError, StepResult, assemble};
    use chrono::NaiveDate;
    use indexmap::IndexMap;

    fn results(entries: Vec<StepResult>) -> FinalReport {
        let map: IndexMap<StepKind, StepResult> =
            entries.into_iter().map(|result| (result.kind, result)).collect();
        assemble("AAPL", &map, OUTLOOK)
    }

    const OUTLOOK: &str = "**Recommendation:** BUY (High Confidence)\n\n\
                           **Investment Thesis:** Services growth <offsets> hardware.";

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 7)
            .and_then(|d| d.and_hms_opt(14, 5, 9))
            .unwrap()
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("AAPL", at()), "AAPL_analysis_2025-03-07_140509.html");
    }

    #[test]
    fn test_markdown_lists_and_emphasis() {
        let html = markdown_to_html("### Trend\n- **Up** 5%\n- _steady_\n1. first\n2. second\nDone & dusted");
        assert_eq!(
            html,
            "<h3>Trend</h3>\n<ul>\n<li><strong>Up</strong> 5%</li>\n<li><em>steady</em></li>\n</ul>\n\
             <ol>\n<li>first</li>\n<li>second</li>\n</ol>\n<p>Done &amp; dusted</p>"
        );
    }

    #[test]
    fn test_recommendation_gets_badge() {
        let html = markdown_to_html("**Recommendation:** hold (Medium Confidence)");
        assert!(html.contains("<span class=\"badge hold\">HOLD</span>"));
    }

    #[test]
    fn test_render_cards_and_badge() {
        let report = results(vec![
            StepResult::success(StepKind::Technical, "Price above 50D MA."),
            StepResult::failure(StepKind::News, StepError::data("no news found for AAPL")),
        ]);
        let summary = InvestmentSummary::parse(OUTLOOK);

        let html = render(&report, &summary, at()).unwrap();

        assert!(html.contains("<title>Stock Analysis Report - AAPL</title>"));
        assert!(html.contains("<span class=\"badge buy\">BUY</span>"));
        assert!(html.contains("(High Confidence)"));
        assert!(html.contains("<h2>Technical Analysis</h2>"));
        assert!(html.contains("Analysis unavailable: no news found for AAPL"));
        assert!(html.contains("<h2>AI Investment Outlook</h2>"));
        assert!(html.contains("&lt;offsets&gt;"));
        assert!(!html.contains("<h2>Fundamental Analysis</h2>"));
        assert!(html.contains("March 07, 2025"));
    }

    #[test]
    fn test_unavailable_section_view() {
        let section = ReportSection {
            title: "Macro Analysis".to_string(),
            step: Some(StepKind::Macro),
            body: SectionBody::Unavailable("timed out after 90s".to_string()),
        };
        let view = SectionView::new(&section);
        assert!(view.unavailable);
        assert_eq!(view.reason, "Analysis unavailable: timed out after 90s");
        assert_eq!(view.icon_class, "macro");
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let report = results(vec![StepResult::success(StepKind::Macro, "Calm markets.")]);
        let summary = InvestmentSummary::parse(OUTLOOK);

        let path = save(&dir.path().join("reports"), &report, &summary, at()).unwrap();

        assert!(path.ends_with("AAPL_analysis_2025-03-07_140509.html"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
