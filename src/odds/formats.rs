//! Price-to-odds conversions for one side of a binary contract.
//!
//! All inputs are a price in cents. Callers guarantee `1..=99`.

/// Market price read as a probability.
pub fn implied_probability(price_cents: u8) -> f64 {
    f64::from(price_cents) / 100.0
}

/// Decimal (European) odds: total return per unit staked, rounded to 3 dp
/// with ties to even (64¢ gives 1.562).
pub fn decimal_odds(price_cents: u8) -> f64 {
    debug_assert!(price_cents > 0, "price must be positive");
    round_to(100.0 / f64::from(price_cents), 3)
}

/// American moneyline.
///
/// Favorite or pick-em (implied ≥ 50%): `-round(p / (1 - p) * 100)`.
/// Underdog: `+round((1 - p) / p * 100)`. At 50¢ this gives -100.
pub fn american_odds(price_cents: u8) -> i32 {
    let prob = implied_probability(price_cents);
    if prob >= 0.5 {
        -((prob / (1.0 - prob) * 100.0).round() as i32)
    } else {
        ((1.0 - prob) / prob * 100.0).round() as i32
    }
}

/// Fractional odds `(100 - price) / price` in lowest terms, e.g. `"3/1"`.
pub fn fractional_odds(price_cents: u8) -> String {
    let numerator = 100u32.saturating_sub(u32::from(price_cents));
    let denominator = u32::from(price_cents);
    if numerator == 0 {
        return "0/1".to_string();
    }
    let divisor = gcd(numerator, denominator);
    format!("{}/{}", numerator / divisor, denominator / divisor)
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}
