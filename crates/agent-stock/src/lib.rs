//! Stock analysis on top of the workflow engine
//!
//! This crate supplies the concrete pieces the engine schedules:
//!
//! - Data capabilities: [`MarketData`], [`WebSearch`] and [`SentimentIndex`],
//!   with live clients for Yahoo Finance, Alpha Vantage and the CNN Fear &
//!   Greed index under [`api`]
//! - The four analysts (technical, fundamental, news, macro)
//! - Two routers: [`LlmRouter`] (structured model output) and
//!   [`KeywordRouter`] (offline heuristics)
//! - [`LlmSynthesizer`] for the investment outlook
//! - [`build_engine`], which wires all of the above from [`Settings`](agent_utils::Settings)
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_stock::build_live_engine;
//! use agent_utils::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load("config.yaml")?;
//!     let engine = build_live_engine(&settings)?;
//!
//!     let report = engine.analyze("Should I buy NVDA?").await?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod data;
pub mod error;
pub mod executors;
pub mod factory;
pub mod models;
pub mod router;
pub mod sector;
pub mod synthesizer;

pub use data::{MarketData, SentimentIndex, WebSearch};
pub use error::{Result, StockError};
pub use executors::{
    AnalystModel, FundamentalAnalyst, GEOPOLITICAL_QUERY, MacroAnalyst, NewsAnalyst,
    TechnicalAnalyst,
};
pub use factory::{Capabilities, build_engine, build_live_engine, generation_params};
pub use models::{FearGreed, Financials, NOT_AVAILABLE, QuoteSnapshot, SearchHit};
pub use router::{KeywordRouter, LlmRouter};
pub use sector::sector_etf;
pub use synthesizer::LlmSynthesizer;
