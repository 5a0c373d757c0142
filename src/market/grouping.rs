use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use super::ticker::extract_team_abbrev;
use super::MarketSnapshot;

/// Both sides of one game: Kalshi lists a separate YES market per team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameGroup {
    pub event_ticker: String,
    pub game_date: Option<NaiveDate>,
    pub expected_expiration_time: Option<String>,
    pub team_a_name: String,
    pub team_a_abbrev: String,
    pub team_a_ticker: String,
    pub team_b_name: String,
    pub team_b_abbrev: String,
    pub team_b_ticker: String,
    pub combined_volume: u64,
}

/// Group items by event ticker, preserving first-seen order of events and of
/// items within each event.
pub fn group_by_event<T, F>(items: Vec<T>, event_of: F) -> Vec<(String, Vec<T>)>
where
    F: Fn(&T) -> &str,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<T>)> = Vec::new();
    for item in items {
        let key = event_of(&item).to_string();
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(item);
    }
    groups
}

/// Pair up the per-team markets of each game.
///
/// Events with fewer than two markets are dropped. Within an event the two
/// lowest tickers become team A and team B. Result is sorted by combined
/// volume, highest first.
pub fn group_markets_by_game(markets: &[MarketSnapshot]) -> Vec<GameGroup> {
    let refs: Vec<&MarketSnapshot> = markets.iter().collect();
    let mut games: Vec<GameGroup> = group_by_event(refs, |m| m.event_ticker.as_str())
        .into_iter()
        .filter_map(|(event_ticker, mut event_markets)| {
            if event_markets.len() < 2 {
                return None;
            }
            event_markets.sort_by(|a, b| a.ticker.cmp(&b.ticker));
            let (a, b) = (event_markets[0], event_markets[1]);
            let a_abbrev = extract_team_abbrev(&a.ticker);
            let b_abbrev = extract_team_abbrev(&b.ticker);
            Some(GameGroup {
                game_date: a.game_date,
                expected_expiration_time: a.expected_expiration_time.clone(),
                team_a_name: team_name(a, a_abbrev, "Team A"),
                team_a_abbrev: a_abbrev.unwrap_or("A").to_string(),
                team_a_ticker: a.ticker.clone(),
                team_b_name: team_name(b, b_abbrev, "Team B"),
                team_b_abbrev: b_abbrev.unwrap_or("B").to_string(),
                team_b_ticker: b.ticker.clone(),
                combined_volume: event_markets.iter().map(|m| m.volume).sum(),
                event_ticker,
            })
        })
        .collect();
    games.sort_by(|x, y| y.combined_volume.cmp(&x.combined_volume));
    games
}

fn team_name(market: &MarketSnapshot, abbrev: Option<&str>, fallback: &str) -> String {
    market
        .yes_team
        .as_deref()
        .or(abbrev)
        .unwrap_or(fallback)
        .to_string()
}
