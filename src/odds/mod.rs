//! Odds engine for Kalshi binary markets.
//!
//! Key binary constraint: `yes_price + no_price = 100` cents, always. The NO
//! side is derived from the resolved YES price and never read independently.
//!
//! Because both rows come from one resolved price, the overround of a table
//! is always 0.0 (up to float error). Spread information is carried by the
//! `wide_spread` flag instead.

pub mod formats;
pub mod price;
pub mod table;

pub use price::{resolve_price, valid_price, PriceSource, ResolvedPrice};
pub use table::{build_odds_table, OddsRow, OddsTable, Outcome};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OddsError {
    /// None of bid, ask or last carries a usable 1–99¢ price. The market
    /// should be skipped, never priced with a placeholder.
    #[error("No valid price data (1-99¢) for market {ticker}")]
    NoPriceData { ticker: String },
}
