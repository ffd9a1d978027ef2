//! Step progress printed to stderr while a run is in flight

use agent_workflow::{Phase, RoutingDecision, StepKind, StepStatus, WorkflowObserver};
use std::io::Write;
use std::sync::Mutex;
use std::time::Instant;

/// Prints phase changes and step status lines
#[derive(Default)]
pub struct ConsoleProgress {
    started: Mutex<Option<Instant>>,
}

impl ConsoleProgress {
    fn elapsed(&self) -> String {
        let Ok(mut started) = self.started.lock() else {
            return String::new();
        };
        let start = *started.get_or_insert_with(Instant::now);
        format!("{:>6.1}s", start.elapsed().as_secs_f64())
    }

    fn line(&self, text: &str) {
        let mut err = std::io::stderr().lock();
        let _ = writeln!(err, "[{}] {text}", self.elapsed());
    }
}

/// One status line for a step
pub fn step_line(kind: StepKind, status: StepStatus) -> String {
    format!("{:<28} {status}", kind.title())
}

impl WorkflowObserver for ConsoleProgress {
    fn on_phase(&self, phase: Phase) {
        self.line(&format!("phase: {phase:?}"));
    }

    fn on_decision(&self, decision: &RoutingDecision) {
        let steps: Vec<&str> = decision.enabled_steps.iter().map(|k| k.key()).collect();
        self.line(&format!(
            "routed to {} -> {}",
            decision.ticker,
            if steps.is_empty() {
                "no steps".to_string()
            } else {
                steps.join(", ")
            }
        ));
    }

    fn on_step(&self, kind: StepKind, status: StepStatus) {
        self.line(&step_line(kind, status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_line_alignment() {
        let line = step_line(StepKind::News, StepStatus::Running);
        assert!(line.starts_with("News & Sentiment Analysis"));
        assert!(line.ends_with(" RUNNING"));
        assert_eq!(
            line.len(),
            step_line(StepKind::Macro, StepStatus::Running).len()
        );
    }
}
