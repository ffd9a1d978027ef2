//! Built-in prompt catalog
//!
//! Old versions stay in the catalog so a pin can roll back without a code
//! change.

mod fundamental;
mod investment;
mod macro_context;
mod news;
mod router;
mod technical;

use crate::{PromptId, PromptSpec};

/// Every built-in prompt version
pub fn builtin() -> Vec<PromptSpec> {
    use PromptId::{
        FundamentalAnalyst, InvestmentAnalyst, MacroAnalyst, NewsAnalyst, Router,
        TechnicalAnalyst,
    };

    vec![
        PromptSpec::new(Router, "1.0.0", router::V1_0_0),
        PromptSpec::new(Router, "1.0.1", router::V1_0_1),
        PromptSpec::new(TechnicalAnalyst, "1.0.0", technical::V1_0_0),
        PromptSpec::new(TechnicalAnalyst, "1.1.0", technical::V1_1_0),
        PromptSpec::new(TechnicalAnalyst, "1.1.1", technical::V1_1_1),
        PromptSpec::new(FundamentalAnalyst, "1.0.0", fundamental::V1_0_0),
        PromptSpec::new(FundamentalAnalyst, "1.1.0", fundamental::V1_1_0),
        PromptSpec::new(FundamentalAnalyst, "1.1.1", fundamental::V1_1_1),
        PromptSpec::new(NewsAnalyst, "1.0.0", news::V1_0_0),
        PromptSpec::new(NewsAnalyst, "1.1.0", news::V1_1_0),
        PromptSpec::new(NewsAnalyst, "1.1.1", news::V1_1_1),
        PromptSpec::new(MacroAnalyst, "1.0.0", macro_context::V1_0_0),
        PromptSpec::new(InvestmentAnalyst, "1.0.0", investment::V1_0_0),
        PromptSpec::new(InvestmentAnalyst, "1.0.1", investment::V1_0_1),
    ]
}
