use serde::Serialize;

use super::classify::{adjust_confidence, classify_sentiment, Confidence, Sentiment};
use super::edge::{calc_edge, calc_ev, calc_roi};
use super::estimate::normalize_probabilities;
use crate::config::EngineSettings;
use crate::market::MarketSnapshot;
use crate::odds::{OddsTable, Outcome};

/// Edge/EV/ROI breakdown for one market against an external estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketAnalysis {
    pub market: MarketSnapshot,
    /// Copy of the market's odds table with `edge` filled on both rows.
    pub odds_table: OddsTable,
    /// Estimates after normalization.
    pub llm_yes_prob: f64,
    pub llm_no_prob: f64,
    pub yes_edge: f64,
    pub no_edge: f64,
    /// Per $1 wagered
    pub yes_ev: f64,
    pub no_ev: f64,
    /// Percent of stake
    pub yes_roi: f64,
    pub no_roi: f64,
    pub best_side: Outcome,
    pub best_edge: f64,
    pub best_ev: f64,
    pub best_roi: f64,
    pub sentiment: Sentiment,
    pub confidence: Confidence,
    /// False when the estimate pair summed to zero.
    pub reliable: bool,
}

struct SideFigures {
    edge: f64,
    ev: f64,
    roi: f64,
}

fn side_figures(true_prob: f64, implied: f64, price_cents: u8) -> SideFigures {
    let edge = calc_edge(true_prob, implied);
    let ev = calc_ev(edge, i64::from(price_cents));
    SideFigures {
        edge,
        ev,
        roi: calc_roi(ev),
    }
}

/// Combine a market's odds table with an external YES/NO estimate.
///
/// Ties on edge go to YES. Confidence is capped by the market's volume.
pub fn build_market_analysis(
    market: &MarketSnapshot,
    odds_table: &OddsTable,
    llm_yes_prob: f64,
    llm_no_prob: f64,
    stated_confidence: Confidence,
    settings: &EngineSettings,
) -> MarketAnalysis {
    let probs = normalize_probabilities(llm_yes_prob, llm_no_prob, settings.normalization_tolerance);

    let yes = side_figures(
        probs.yes_prob,
        odds_table.yes_row.implied_prob,
        odds_table.yes_row.price_cents,
    );
    let no = side_figures(
        probs.no_prob,
        odds_table.no_row.implied_prob,
        odds_table.no_row.price_cents,
    );

    let (best_side, best) = if yes.edge >= no.edge {
        (Outcome::Yes, &yes)
    } else {
        (Outcome::No, &no)
    };
    let sentiment = classify_sentiment(best.edge, settings.edge_threshold);
    let confidence = adjust_confidence(stated_confidence, market.volume, settings);

    let mut odds_table = odds_table.clone();
    odds_table.yes_row.edge = Some(yes.edge);
    odds_table.no_row.edge = Some(no.edge);

    MarketAnalysis {
        market: market.clone(),
        odds_table,
        llm_yes_prob: probs.yes_prob,
        llm_no_prob: probs.no_prob,
        yes_edge: yes.edge,
        no_edge: no.edge,
        yes_ev: yes.ev,
        no_ev: no.ev,
        yes_roi: yes.roi,
        no_roi: no.roi,
        best_side,
        best_edge: best.edge,
        best_ev: best.ev,
        best_roi: best.roi,
        sentiment,
        confidence,
        reliable: probs.reliable,
    }
}
