//! Routing decision as a terminal table

use agent_workflow::{RoutingDecision, StepKind};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

/// Table listing each analysis and whether the router enabled it
pub fn decision_table(decision: &RoutingDecision) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![Cell::new("Analysis"), Cell::new("Run")]);

    table.add_row(vec![Cell::new("Ticker"), Cell::new(&decision.ticker)]);
    for kind in StepKind::ALL {
        let enabled = if decision.is_enabled(kind) { "yes" } else { "no" };
        table.add_row(vec![Cell::new(kind.title()), Cell::new(enabled)]);
    }
    if !decision.rationale.is_empty() {
        table.add_row(vec![Cell::new("Reasoning"), Cell::new(&decision.rationale)]);
    }
    table
}
