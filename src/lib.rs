//! Odds conversion and edge/EV analysis for Kalshi binary sports markets.
//!
//! Data flows one way: a market price snapshot goes through the odds engine
//! to an [`odds::OddsTable`]; an external probability estimate is then
//! combined with it into an [`analysis::MarketAnalysis`]. Every step is a pure
//! function of its inputs.

pub mod analysis;
pub mod config;
pub mod market;
pub mod odds;
pub mod pipeline;

pub use analysis::{build_market_analysis, MarketAnalysis, ProbabilityEstimate};
pub use config::EngineSettings;
pub use market::MarketSnapshot;
pub use odds::{build_odds_table, OddsError, OddsTable};
