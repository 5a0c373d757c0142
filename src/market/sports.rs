use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::MarketSnapshot;

/// Kalshi category label carried by (some) sports markets.
pub const SPORTS_CATEGORY: &str = "Sports";

const BASKETBALL_SERIES: &[&str] = &[
    "KXNBAGAME",
    "KXNBAGAMES",
    "KXNCAAMBGAME",
    "KXNCAAWBGAME",
    "KXWNBAGAME",
    "KXUNRIVALEDGAME",
    "KXEUROLEAGUEGAME",
    "KXACBGAME",
    "KXBSLGAME",
    "KXCBAGAME",
    "KXNBLGAME",
];

const FOOTBALL_SERIES: &[&str] = &["KXNFLGAME", "KXNCAAFGAME", "KXNCAAFD3GAME"];

const BASEBALL_SERIES: &[&str] = &["KXMLBGAME", "KXNCAAMBBGAME"];

const SOCCER_SERIES: &[&str] = &[
    "KXMLSGAME",
    "KXEPLGAME",
    "KXLALIGAGAME",
    "KXBUNDESLIGAGAME",
    "KXLIGUE1GAME",
    "KXUCLGAME",
    "KXUELGAME",
    "KXUECLGAME",
    "KXLIGAMXGAME",
    "KXBRASILEIROGAME",
    "KXEREDIVISIEGAME",
    "KXFACUPGAME",
    "KXEFLCHAMPIONSHIPGAME",
    "KXINTLFRIENDLYGAME",
    "KXWCGAME",
];

const TENNIS_SERIES: &[&str] = &[
    "KXATPMATCH",
    "KXWTAMATCH",
    "KXATPCHALLENGERMATCH",
    "KXWTACHALLENGERMATCH",
    "KXATPDOUBLES",
    "KXWTADOUBLES",
    "KXATPGRANDSLAM",
    "KXWTAGRANDSLAM",
];

const HOCKEY_SERIES: &[&str] = &["KXNHLGAME", "KXNCAAHOCKEYGAME", "KXIIHFGAME", "KXKHLGAME"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Basketball,
    Football,
    Baseball,
    Soccer,
    Tennis,
    Hockey,
}

impl Sport {
    pub const ALL: [Sport; 6] = [
        Sport::Basketball,
        Sport::Football,
        Sport::Baseball,
        Sport::Soccer,
        Sport::Tennis,
        Sport::Hockey,
    ];

    /// Kalshi series tickers for individual games of this sport.
    pub fn series(self) -> &'static [&'static str] {
        match self {
            Sport::Basketball => BASKETBALL_SERIES,
            Sport::Football => FOOTBALL_SERIES,
            Sport::Baseball => BASEBALL_SERIES,
            Sport::Soccer => SOCCER_SERIES,
            Sport::Tennis => TENNIS_SERIES,
            Sport::Hockey => HOCKEY_SERIES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Basketball => "basketball",
            Sport::Football => "football",
            Sport::Baseball => "baseball",
            Sport::Soccer => "soccer",
            Sport::Tennis => "tennis",
            Sport::Hockey => "hockey",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sport '{0}' (expected one of basketball, football, baseball, soccer, tennis, hockey)")]
pub struct UnknownSport(pub String);

impl FromStr for Sport {
    type Err = UnknownSport;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Sport::ALL
            .into_iter()
            .find(|sport| sport.as_str() == lower)
            .ok_or_else(|| UnknownSport(s.to_string()))
    }
}

/// Sport whose series prefix matches the event ticker.
///
/// The longest matching prefix wins so that e.g. `KXNBAGAMES` is not
/// shadowed by `KXNBAGAME`.
pub fn sport_for_event(event_ticker: &str) -> Option<Sport> {
    let upper = event_ticker.to_uppercase();
    Sport::ALL
        .into_iter()
        .flat_map(|sport| sport.series().iter().map(move |prefix| (sport, *prefix)))
        .filter(|(_, prefix)| upper.starts_with(prefix))
        .max_by_key(|(_, prefix)| prefix.len())
        .map(|(sport, _)| sport)
}

/// True for individual sports game markets.
///
/// The series prefix is checked first; game market objects usually come back
/// with a null category, so the category label is only a fallback.
pub fn is_sports_market(market: &MarketSnapshot) -> bool {
    sport_for_event(&market.event_ticker).is_some()
        || market.category.as_deref() == Some(SPORTS_CATEGORY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_series() {
        assert_eq!(sport_for_event("KXNBAGAME-26FEB22CLEOKC"), Some(Sport::Basketball));
        assert_eq!(sport_for_event("kxeplgame-26feb22arsche"), Some(Sport::Soccer));
        assert_eq!(sport_for_event("KXATPMATCH-26FEB22SINALC"), Some(Sport::Tennis));
        assert_eq!(sport_for_event("KXNHLGAME-26FEB22BOSNYR"), Some(Sport::Hockey));
        assert_eq!(sport_for_event("KXFEDDECISION-26MAR"), None);
    }

    #[test]
    fn category_is_a_fallback() {
        let mut market = MarketSnapshot::new("OTHER-1-X", "OTHER-1");
        assert!(!is_sports_market(&market));
        market.category = Some("Sports".into());
        assert!(is_sports_market(&market));
    }

    #[test]
    fn parses_sport_names() {
        assert_eq!("Soccer".parse::<Sport>(), Ok(Sport::Soccer));
        assert_eq!(" hockey ".parse::<Sport>(), Ok(Sport::Hockey));
        assert!("curling".parse::<Sport>().is_err());
    }
}
