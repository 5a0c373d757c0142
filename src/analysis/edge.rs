/// Edge of an external probability estimate over the market.
///
/// Edge = true_prob − market_implied
///
/// Positive edge means the market underprices the outcome. No range checks:
/// callers supply probabilities in [0, 1].
pub fn calc_edge(true_prob: f64, market_implied: f64) -> f64 {
    true_prob - market_implied
}

/// Expected value per $1 wagered.
///
/// EV = edge / (price_cents / 100)
///
/// i.e. the edge normalized by the cost of one contract. Returns `0.0` for a
/// non-positive price.
pub fn calc_ev(edge: f64, price_cents: i64) -> f64 {
    if price_cents <= 0 {
        return 0.0;
    }
    edge / (price_cents as f64 / 100.0)
}

/// Return on investment as a percentage of stake. `ev` is already per $1, so
/// this is a straight scale.
pub fn calc_roi(ev: f64) -> f64 {
    ev * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_edge_positive_and_negative() {
        assert_relative_eq!(calc_edge(0.58, 0.46), 0.12, epsilon = 1e-9);
        assert_relative_eq!(calc_edge(0.42, 0.54), -0.12, epsilon = 1e-9);
        assert_relative_eq!(calc_edge(0.5, 0.5), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_edge_does_not_clamp() {
        assert_relative_eq!(calc_edge(1.2, 0.3), 0.9, epsilon = 1e-9);
    }

    #[test]
    fn test_ev_normalizes_by_price() {
        assert_relative_eq!(calc_ev(0.12, 46), 0.260_869_565, epsilon = 1e-6);
        assert_relative_eq!(calc_ev(-0.12, 54), -0.222_222_222, epsilon = 1e-6);
        assert_relative_eq!(calc_ev(0.05, 100), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_ev_zero_price_floor() {
        assert_eq!(calc_ev(0.3, 0), 0.0);
        assert_eq!(calc_ev(0.3, -10), 0.0);
    }

    #[test]
    fn test_roi_is_percentage_of_ev() {
        assert_relative_eq!(calc_roi(0.2609), 26.09, epsilon = 1e-9);
        assert_relative_eq!(calc_roi(-0.1), -10.0, epsilon = 1e-9);
    }
}
