//! Helpers for the structured fields Kalshi packs into its tickers.
//!
//! Event tickers look like `KXNBAGAME-26FEB22CLEOKC`: a series prefix, then
//! a segment that starts with the game date as `YYMONDD`. Market tickers add
//! one more segment naming the YES team, e.g. `KXNBAGAME-26FEB23SASDET-SAS`.

use chrono::NaiveDate;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Extract the game date encoded in an event ticker.
///
/// Returns `None` when the second segment does not start with a valid
/// `YYMONDD` date (upper-case month).
pub fn parse_game_date(event_ticker: &str) -> Option<NaiveDate> {
    let segment = event_ticker.split('-').nth(1)?;
    let (yy, mon, dd) = (segment.get(0..2)?, segment.get(2..5)?, segment.get(5..7)?);
    if !yy.bytes().all(|b| b.is_ascii_digit()) || !dd.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month = MONTHS.iter().position(|m| *m == mon)? as u32 + 1;
    let year = 2000 + yy.parse::<i32>().ok()?;
    let day = dd.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Team abbreviation from the last segment of a market ticker.
pub fn extract_team_abbrev(ticker: &str) -> Option<&str> {
    let parts: Vec<&str> = ticker.split('-').collect();
    if parts.len() >= 3 {
        parts.last().copied()
    } else {
        None
    }
}

/// Given an event title "Philadelphia at Minnesota" and the YES team,
/// return the other team. Matching is case-insensitive.
pub fn derive_opponent(event_title: &str, yes_team: &str) -> Option<String> {
    let (team_a, team_b) = event_title.split_once(" at ")?;
    let (team_a, team_b) = (team_a.trim(), team_b.trim());
    let yes_lower = yes_team.to_lowercase();
    if yes_lower == team_b.to_lowercase() {
        Some(team_a.to_string())
    } else if yes_lower == team_a.to_lowercase() {
        Some(team_b.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_game_date_from_event_ticker() {
        assert_eq!(
            parse_game_date("KXNBAGAME-26FEB22CLEOKC"),
            NaiveDate::from_ymd_opt(2026, 2, 22)
        );
        assert_eq!(
            parse_game_date("KXEPLGAME-25DEC01ARSCHE"),
            NaiveDate::from_ymd_opt(2025, 12, 1)
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_game_date("KXNBAGAME"), None);
        assert_eq!(parse_game_date("KXNBAGAME-26XYZ22CLE"), None);
        assert_eq!(parse_game_date("KXNBAGAME-26feb22CLE"), None);
        assert_eq!(parse_game_date("KXNBAGAME-26FEB30CLE"), None);
        assert_eq!(parse_game_date("KXNBAGAME-26FE"), None);
    }

    #[test]
    fn extracts_team_abbreviation() {
        assert_eq!(extract_team_abbrev("KXNBAGAME-26FEB23SASDET-SAS"), Some("SAS"));
        assert_eq!(extract_team_abbrev("KXNBAGAME-26FEB23SASDET"), None);
    }

    #[test]
    fn derives_opponent_from_event_title() {
        let title = "Philadelphia at Minnesota";
        assert_eq!(derive_opponent(title, "Minnesota").as_deref(), Some("Philadelphia"));
        assert_eq!(derive_opponent(title, "philadelphia").as_deref(), Some("Minnesota"));
        assert_eq!(derive_opponent(title, "Boston"), None);
        assert_eq!(derive_opponent("Philadelphia vs Minnesota", "Minnesota"), None);
    }
}
