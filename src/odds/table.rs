use serde::{Deserialize, Serialize};
use std::fmt;

use super::formats::{american_odds, decimal_odds, fractional_odds, implied_probability};
use super::{resolve_price, OddsError, PriceSource};
use crate::config::EngineSettings;
use crate::market::MarketSnapshot;

/// Side of a binary contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Yes => "YES",
            Outcome::No => "NO",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the odds table: the YES or NO side of a binary market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsRow {
    pub outcome: Outcome,
    /// 1–99
    pub price_cents: u8,
    /// price_cents / 100
    pub implied_prob: f64,
    /// 100 / price_cents, 3 dp
    pub decimal_odds: f64,
    pub american_odds: i32,
    /// e.g. "4/1" or "1/4"
    pub fractional_str: String,
    /// Filled once an external probability estimate has been applied.
    pub edge: Option<f64>,
}

impl OddsRow {
    pub fn new(outcome: Outcome, price_cents: u8) -> Self {
        OddsRow {
            outcome,
            price_cents,
            implied_prob: implied_probability(price_cents),
            decimal_odds: decimal_odds(price_cents),
            american_odds: american_odds(price_cents),
            fractional_str: fractional_odds(price_cents),
            edge: None,
        }
    }
}

/// Complete odds view of one market at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsTable {
    pub yes_row: OddsRow,
    pub no_row: OddsRow,
    /// (yes_implied + no_implied) - 1.0
    pub overround: f64,
    pub price_source: PriceSource,
    /// Bid/ask gap exceeded the configured threshold
    pub wide_spread: bool,
}

impl OddsTable {
    pub fn row(&self, outcome: Outcome) -> &OddsRow {
        match outcome {
            Outcome::Yes => &self.yes_row,
            Outcome::No => &self.no_row,
        }
    }
}

/// Build the odds table for a market.
///
/// The NO price is always `100 - yes`. Fails with `NoPriceData` when no
/// quote tier is usable; the caller skips the market.
pub fn build_odds_table(
    market: &MarketSnapshot,
    settings: &EngineSettings,
) -> Result<OddsTable, OddsError> {
    let resolved = resolve_price(market, settings.preferred_source, settings.wide_spread_threshold)?;
    let yes_row = OddsRow::new(Outcome::Yes, resolved.cents);
    let no_row = OddsRow::new(Outcome::No, 100 - resolved.cents);
    let overround = yes_row.implied_prob + no_row.implied_prob - 1.0;

    Ok(OddsTable {
        yes_row,
        no_row,
        overround,
        price_source: resolved.source,
        wide_spread: resolved.wide_spread,
    })
}
