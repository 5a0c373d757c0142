use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ticker::{derive_opponent, parse_game_date};

/// Games are assumed to end roughly this long after they start.
const ASSUMED_GAME_LENGTH_HOURS: i64 = 3;

/// A Kalshi binary market as seen at one point in time.
///
/// Price fields are kept exactly as quoted (cents, possibly null, zero or out
/// of range); the odds engine decides which of them are usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMarket")]
pub struct MarketSnapshot {
    pub ticker: String,
    pub title: String,
    pub event_ticker: String,
    pub category: Option<String>,
    /// "open" | "closed" | "settled" ...
    pub status: String,
    pub yes_bid: Option<i64>,
    pub yes_ask: Option<i64>,
    /// Last traded YES price
    pub last_price: Option<i64>,
    /// Contracts traded
    pub volume: u64,
    /// Open contracts
    pub open_interest: u64,
    /// Settlement deadline (ISO 8601), not the game date
    pub close_time: Option<String>,
    /// ISO 8601, used as a proxy for the game's end
    pub expected_expiration_time: Option<String>,
    /// Team backing the YES outcome
    pub yes_team: Option<String>,
    pub no_team: Option<String>,
    /// Parsed from `event_ticker`
    pub game_date: Option<NaiveDate>,
}

impl MarketSnapshot {
    pub fn new(ticker: impl Into<String>, event_ticker: impl Into<String>) -> Self {
        let event_ticker = event_ticker.into();
        MarketSnapshot {
            ticker: ticker.into(),
            game_date: parse_game_date(&event_ticker),
            event_ticker,
            status: "open".into(),
            ..MarketSnapshot::default()
        }
    }

    pub fn with_quotes(mut self, yes_bid: Option<i64>, yes_ask: Option<i64>, last_price: Option<i64>) -> Self {
        self.yes_bid = yes_bid;
        self.yes_ask = yes_ask;
        self.last_price = last_price;
        self
    }

    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = volume;
        self
    }

    /// Integer midpoint of the YES bid/ask, or whichever side is quoted.
    pub fn mid_price(&self) -> Option<i64> {
        match (self.yes_bid, self.yes_ask) {
            (Some(bid), Some(ask)) => Some((bid + ask).div_euclid(2)),
            (Some(bid), None) => Some(bid),
            (None, ask) => ask,
        }
    }

    /// Bid/ask spread in cents. `None` unless both sides are quoted.
    pub fn spread_cents(&self) -> Option<i64> {
        match (self.yes_bid, self.yes_ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Estimated kickoff: expected expiration minus a typical game length.
    pub fn estimated_start(&self) -> Option<DateTime<Utc>> {
        let raw = self.expected_expiration_time.as_deref()?;
        let expires = DateTime::parse_from_rfc3339(raw).ok()?.with_timezone(&Utc);
        Some(expires - Duration::hours(ASSUMED_GAME_LENGTH_HOURS))
    }

    /// Whether the game has (probably) started by `now`. Unknown start → false.
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.estimated_start().is_some_and(|start| now >= start)
    }
}

/// Wire shape of a Kalshi REST market object. Every field may be null.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMarket {
    ticker: Option<String>,
    title: Option<String>,
    event_ticker: Option<String>,
    event_title: Option<String>,
    category: Option<String>,
    status: Option<String>,
    yes_bid: Option<i64>,
    yes_ask: Option<i64>,
    last_price: Option<i64>,
    volume: Option<i64>,
    volume_24h: Option<i64>,
    open_interest: Option<i64>,
    close_time: Option<String>,
    expected_expiration_time: Option<String>,
    #[serde(alias = "yes_team")]
    yes_sub_title: Option<String>,
    no_team: Option<String>,
}

fn non_negative(n: Option<i64>) -> u64 {
    n.map(|v| v.max(0) as u64).unwrap_or(0)
}

impl From<RawMarket> for MarketSnapshot {
    fn from(raw: RawMarket) -> Self {
        let event_ticker = raw.event_ticker.unwrap_or_default();
        let yes_team = raw.yes_sub_title.filter(|t| !t.is_empty());
        // A zero "volume" is treated as missing and falls back to the 24h figure.
        let volume = raw.volume.filter(|v| *v != 0).or(raw.volume_24h);
        let no_team = raw.no_team.or_else(|| {
            let title = raw.event_title.as_deref()?;
            derive_opponent(title, yes_team.as_deref()?)
        });
        MarketSnapshot {
            ticker: raw.ticker.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            game_date: parse_game_date(&event_ticker),
            event_ticker,
            category: raw.category,
            status: raw.status.unwrap_or_default(),
            yes_bid: raw.yes_bid,
            yes_ask: raw.yes_ask,
            last_price: raw.last_price,
            volume: non_negative(volume),
            open_interest: non_negative(raw.open_interest),
            close_time: raw.close_time,
            expected_expiration_time: raw.expected_expiration_time,
            yes_team,
            no_team,
        }
    }
}
