use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::OddsError;
use crate::market::MarketSnapshot;

/// Lowest tradable Kalshi price.
pub const MIN_PRICE_CENTS: u8 = 1;
/// Highest tradable Kalshi price.
pub const MAX_PRICE_CENTS: u8 = 99;

/// Which quote tier supplied the YES price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    #[default]
    Mid,
    Last,
    Ask,
    Bid,
}

impl PriceSource {
    pub fn as_str(self) -> &'static str {
        match self {
            PriceSource::Mid => "mid",
            PriceSource::Last => "last",
            PriceSource::Ask => "ask",
            PriceSource::Bid => "bid",
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown price source '{0}' (expected mid, last, ask or bid)")]
pub struct UnknownPriceSource(pub String);

impl FromStr for PriceSource {
    type Err = UnknownPriceSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mid" => Ok(PriceSource::Mid),
            "last" => Ok(PriceSource::Last),
            "ask" => Ok(PriceSource::Ask),
            "bid" => Ok(PriceSource::Bid),
            _ => Err(UnknownPriceSource(s.to_string())),
        }
    }
}

/// Outcome of price resolution for the YES side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPrice {
    pub cents: u8,
    pub source: PriceSource,
    /// Only ever set on the mid tier, where both bid and ask are known.
    pub wide_spread: bool,
}

/// A quote is usable only inside `1..=99`; zero, negatives, nulls and
/// anything above 99 are treated as absent.
pub fn valid_price(raw: Option<i64>) -> Option<u8> {
    raw.filter(|p| (i64::from(MIN_PRICE_CENTS)..=i64::from(MAX_PRICE_CENTS)).contains(p))
        .map(|p| p as u8)
}

/// Resolve the YES price in cents.
///
/// Fallback chain: mid (only when preferred and both sides are quoted) →
/// last → ask → bid. Any preference other than `Mid` goes straight to the
/// chain.
pub fn resolve_price(
    market: &MarketSnapshot,
    preferred: PriceSource,
    wide_spread_threshold: u8,
) -> Result<ResolvedPrice, OddsError> {
    let bid = valid_price(market.yes_bid);
    let ask = valid_price(market.yes_ask);
    let last = valid_price(market.last_price);

    if let (PriceSource::Mid, Some(bid), Some(ask)) = (preferred, bid, ask) {
        let spread = i16::from(ask) - i16::from(bid);
        return Ok(ResolvedPrice {
            cents: ((u16::from(bid) + u16::from(ask)) / 2) as u8,
            source: PriceSource::Mid,
            wide_spread: spread > i16::from(wide_spread_threshold),
        });
    }

    let fallback = [
        (last, PriceSource::Last),
        (ask, PriceSource::Ask),
        (bid, PriceSource::Bid),
    ];
    fallback
        .into_iter()
        .find_map(|(price, source)| {
            price.map(|cents| ResolvedPrice {
                cents,
                source,
                wide_spread: false,
            })
        })
        .ok_or_else(|| OddsError::NoPriceData {
            ticker: market.ticker.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(bid: Option<i64>, ask: Option<i64>, last: Option<i64>) -> MarketSnapshot {
        MarketSnapshot::new("KXNBAGAME-26FEB22CLEOKC-OKC", "KXNBAGAME-26FEB22CLEOKC")
            .with_quotes(bid, ask, last)
    }

    #[test]
    fn valid_price_domain_is_one_to_ninety_nine() {
        assert_eq!(valid_price(Some(1)), Some(1));
        assert_eq!(valid_price(Some(99)), Some(99));
        assert_eq!(valid_price(Some(0)), None);
        assert_eq!(valid_price(Some(100)), None);
        assert_eq!(valid_price(Some(-5)), None);
        assert_eq!(valid_price(None), None);
    }

    #[test]
    fn mid_uses_integer_division() {
        let r = resolve_price(&quoted(Some(44), Some(49), Some(60)), PriceSource::Mid, 10).unwrap();
        assert_eq!(r.cents, 46);
        assert_eq!(r.source, PriceSource::Mid);
        assert!(!r.wide_spread);
    }

    #[test]
    fn wide_spread_flag() {
        let wide = resolve_price(&quoted(Some(40), Some(55), None), PriceSource::Mid, 10).unwrap();
        assert!(wide.wide_spread);

        let tight = resolve_price(&quoted(Some(44), Some(50), None), PriceSource::Mid, 10).unwrap();
        assert!(!tight.wide_spread);

        // Exactly at the threshold is not wide.
        let edge = resolve_price(&quoted(Some(40), Some(50), None), PriceSource::Mid, 10).unwrap();
        assert!(!edge.wide_spread);
    }

    #[test]
    fn falls_back_to_last_then_ask_then_bid() {
        let r = resolve_price(&quoted(None, None, Some(55)), PriceSource::Mid, 10).unwrap();
        assert_eq!((r.cents, r.source), (55, PriceSource::Last));

        let r = resolve_price(&quoted(Some(30), Some(0), None), PriceSource::Mid, 10).unwrap();
        assert_eq!((r.cents, r.source), (30, PriceSource::Bid));

        let r = resolve_price(&quoted(Some(0), Some(62), Some(100)), PriceSource::Mid, 10).unwrap();
        assert_eq!((r.cents, r.source), (62, PriceSource::Ask));
    }

    #[test]
    fn non_mid_preference_skips_mid_tier() {
        let r = resolve_price(&quoted(Some(44), Some(48), Some(51)), PriceSource::Bid, 10).unwrap();
        assert_eq!((r.cents, r.source), (51, PriceSource::Last));
        assert!(!r.wide_spread);
    }

    #[test]
    fn no_price_is_an_error() {
        let err = resolve_price(&quoted(None, None, None), PriceSource::Mid, 10).unwrap_err();
        assert_eq!(
            err,
            OddsError::NoPriceData {
                ticker: "KXNBAGAME-26FEB22CLEOKC-OKC".into()
            }
        );

        let zeros = quoted(Some(0), Some(0), Some(0));
        assert!(resolve_price(&zeros, PriceSource::Mid, 10).is_err());
    }

    #[test]
    fn parses_source_names() {
        assert_eq!("MID".parse::<PriceSource>(), Ok(PriceSource::Mid));
        assert_eq!("last".parse::<PriceSource>(), Ok(PriceSource::Last));
        assert!("vwap".parse::<PriceSource>().is_err());
    }
}
