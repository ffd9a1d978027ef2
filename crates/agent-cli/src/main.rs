//! Command-line interface for think-once stock analysis

mod html;
mod progress;
mod table;

use agent_utils::{ExecutionMode, LogFormat, RouterKind, Settings, init_tracing_with};
use agent_workflow::{AnalysisRequest, WorkflowError};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

const DEFAULT_QUERY: &str = "Analyze NVDA stock";
const VERBOSE_FILTER: &str =
    "info,agent_cli=debug,agent_workflow=debug,agent_stock=debug,agent_llm=debug,agent_prompt=debug";

#[derive(Parser, Debug)]
#[command(name = "agent-cli")]
#[command(about = "Multi-agent stock analysis from a plain-language question", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Route a question, run the selected analyses and print the report
    Analyze(AnalyzeArgs),
}

#[derive(clap::Args, Debug)]
struct AnalyzeArgs {
    /// Question about a stock, e.g. "What's the news on AAPL?"
    #[arg(default_value = DEFAULT_QUERY)]
    query: String,

    /// Settings file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Run steps one after another
    #[arg(long)]
    sequential: bool,

    /// Route with keyword rules instead of a model call
    #[arg(long)]
    keyword_router: bool,

    /// Also write a styled HTML report into this directory
    #[arg(long, value_name = "DIR")]
    html: Option<PathBuf>,

    /// Show the routing decision, step progress and debug logs
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl AnalyzeArgs {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::load(&self.config)?;
        if self.sequential {
            settings.agents.execution = ExecutionMode::Sequential;
        }
        if self.keyword_router {
            settings.agents.router = RouterKind::Keyword;
        }
        if self.verbose {
            settings.agents.verbose = true;
        }
        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => analyze(args).await,
    }
}

async fn analyze(args: AnalyzeArgs) -> anyhow::Result<ExitCode> {
    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing_with(format, if args.verbose { VERBOSE_FILTER } else { "info" });

    let settings = args.settings()?;
    debug!(?settings.agents, "Resolved settings");

    let mut engine = agent_stock::build_live_engine(&settings)?;
    if args.verbose {
        engine = engine.with_observer(Arc::new(progress::ConsoleProgress::default()));
    }

    println!("Query: {}\n", args.query);
    let outcome = match engine.run(AnalysisRequest::new(args.query.as_str())).await {
        Ok(outcome) => outcome,
        Err(WorkflowError::Routing(reason)) => {
            eprintln!("Could not determine ticker/intent: {reason}");
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    };

    if args.verbose {
        println!("{}\n", table::decision_table(&outcome.decision));
    }
    println!("{}", outcome.markdown());

    if let Some(dir) = &args.html {
        let generated = chrono::Local::now().naive_local();
        let path = html::save(dir, &outcome.report, &outcome.summary, generated)?;
        info!(path = %path.display(), "HTML report written");
        println!("HTML report saved to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["agent-cli", "analyze"]).unwrap();
        let Commands::Analyze(args) = cli.command;
        assert_eq!(args.query, DEFAULT_QUERY);
        assert_eq!(args.config, PathBuf::from("config.yaml"));
        assert!(!args.sequential && !args.keyword_router && !args.verbose);
        assert!(args.html.is_none());
    }

    #[test]
    fn test_flags_override_settings() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.yaml");
        std::fs::write(&config, "agents:\n  router: llm\n").unwrap();

        let cli = Cli::try_parse_from([
            "agent-cli",
            "analyze",
            "News on AAPL",
            "--config",
            config.to_str().unwrap(),
            "--sequential",
            "--keyword-router",
            "--verbose",
        ])
        .unwrap();
        let Commands::Analyze(args) = cli.command;
        let settings = args.settings().unwrap();

        assert_eq!(args.query, "News on AAPL");
        assert_eq!(settings.agents.execution, ExecutionMode::Sequential);
        assert_eq!(settings.agents.router, RouterKind::Keyword);
        assert!(settings.agents.verbose);
    }
}
