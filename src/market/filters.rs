use chrono::{DateTime, Utc};
use tracing::debug;

use super::{is_sports_market, sport_for_event, MarketSnapshot, Sport};

/// Keep markets meeting both liquidity minimums (contracts).
pub fn apply_filters(
    markets: Vec<MarketSnapshot>,
    min_volume: u64,
    min_open_interest: u64,
) -> Vec<MarketSnapshot> {
    markets
        .into_iter()
        .filter(|m| m.volume >= min_volume && m.open_interest >= min_open_interest)
        .collect()
}

/// Selection criteria applied before any pricing happens.
#[derive(Debug, Clone, Default)]
pub struct MarketFilter {
    pub min_volume: u64,
    pub min_open_interest: u64,
    /// Empty means every sport.
    pub sports: Vec<Sport>,
    pub sports_only: bool,
    pub exclude_started: bool,
}

impl MarketFilter {
    pub fn apply(&self, markets: Vec<MarketSnapshot>, now: DateTime<Utc>) -> Vec<MarketSnapshot> {
        let before = markets.len();
        let kept: Vec<MarketSnapshot> = apply_filters(markets, self.min_volume, self.min_open_interest)
            .into_iter()
            .filter(|m| !self.sports_only || is_sports_market(m))
            .filter(|m| {
                self.sports.is_empty()
                    || sport_for_event(&m.event_ticker).is_some_and(|s| self.sports.contains(&s))
            })
            .filter(|m| !self.exclude_started || !m.has_started(now))
            .collect();
        debug!("Market filter kept {} of {} market(s)", kept.len(), before);
        kept
    }
}
