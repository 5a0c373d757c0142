//! Batch driver: decodes input entries, prices every market, applies
//! estimates, and keeps a run-level log of what was skipped. A malformed
//! entry, a market that cannot be priced or one with no estimate is dropped
//! from the results; none of them aborts the batch.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::analysis::{
    build_market_analysis, parse_response, Confidence, MarketAnalysis, ProbabilityEstimate,
};
use crate::config::EngineSettings;
use crate::market::MarketSnapshot;
use crate::odds::{build_odds_table, OddsTable};

/// Counters and soft errors for one run. Passed around explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetrics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub markets_fetched: usize,
    pub markets_after_filter: usize,
    pub markets_priced: usize,
    pub markets_skipped: usize,
    pub analyses_built: usize,
    pub errors: Vec<String>,
}

impl RunMetrics {
    pub fn start() -> Self {
        RunMetrics {
            started_at: Utc::now(),
            finished_at: None,
            markets_fetched: 0,
            markets_after_filter: 0,
            markets_priced: 0,
            markets_skipped: 0,
            analyses_built: 0,
            errors: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|end| (end - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

fn entry_label(entry: &Value, index: usize) -> String {
    match entry.get("ticker").and_then(Value::as_str) {
        Some(ticker) => ticker.to_string(),
        None => format!("entry #{index}"),
    }
}

/// Decode entries one at a time, recording and skipping the ones that fail.
fn decode_entries<T: DeserializeOwned>(
    entries: Vec<Value>,
    kind: &str,
    metrics: &mut RunMetrics,
) -> Vec<T> {
    let mut decoded = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let label = entry_label(&entry, index);
        match serde_json::from_value::<T>(entry) {
            Ok(item) => decoded.push(item),
            Err(e) => {
                warn!("Malformed {} {}: {}", kind, label, e);
                metrics
                    .errors
                    .push(format!("Malformed {kind} {label} — skipped: {e}"));
            }
        }
    }
    decoded
}

/// Kalshi market objects, one per entry.
pub fn decode_markets(entries: Vec<Value>, metrics: &mut RunMetrics) -> Vec<MarketSnapshot> {
    metrics.markets_fetched += entries.len();
    decode_entries(entries, "market", metrics)
}

/// JSON estimate records, one per entry. Probabilities outside `[0, 1]`
/// count as malformed.
pub fn decode_estimates(entries: Vec<Value>, metrics: &mut RunMetrics) -> Vec<ProbabilityEstimate> {
    decode_entries(entries, "estimate", metrics)
}

#[derive(Deserialize)]
struct ModelResponse {
    ticker: String,
    response: String,
}

/// Raw tagged model answers (`{"ticker", "response"}`), one per entry.
pub fn decode_responses(
    entries: Vec<Value>,
    fallback_confidence: Confidence,
    metrics: &mut RunMetrics,
) -> Vec<ProbabilityEstimate> {
    let responses: Vec<ModelResponse> = decode_entries(entries, "model response", metrics);
    let mut estimates = Vec::with_capacity(responses.len());
    for r in responses {
        match parse_response(&r.ticker, &r.response, fallback_confidence) {
            Ok(parsed) => {
                if let Some((side, edge)) = parsed.recommendation {
                    debug!("{}: model recommends {} at {:.1}% edge", r.ticker, side, edge * 100.0);
                }
                estimates.push(parsed.estimate);
            }
            Err(e) => {
                warn!("{}: unreadable model response: {}", r.ticker, e);
                metrics
                    .errors
                    .push(format!("Unreadable model response for {} — skipped: {e}", r.ticker));
            }
        }
    }
    estimates
}

/// A market together with its odds table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedMarket {
    pub market: MarketSnapshot,
    pub odds_table: OddsTable,
}

/// Build odds tables, skipping markets with no usable price.
pub fn price_markets(
    markets: Vec<MarketSnapshot>,
    settings: &EngineSettings,
    metrics: &mut RunMetrics,
) -> Vec<PricedMarket> {
    let mut priced = Vec::with_capacity(markets.len());
    let mut skipped = 0usize;
    for market in markets {
        match build_odds_table(&market, settings) {
            Ok(odds_table) => {
                if odds_table.wide_spread {
                    debug!(
                        "{}: wide spread (bid {:?} / ask {:?})",
                        market.ticker, market.yes_bid, market.yes_ask
                    );
                }
                priced.push(PricedMarket { market, odds_table });
            }
            Err(e) => {
                warn!("{}", e);
                skipped += 1;
                metrics
                    .errors
                    .push(format!("No price data for {} — skipped", market.ticker));
            }
        }
    }
    if skipped > 0 {
        info!("Skipped {} market(s) with no bid/ask/last price data", skipped);
    }
    metrics.markets_priced += priced.len();
    metrics.markets_skipped += skipped;
    priced
}

/// Key estimates by ticker. A later entry for the same ticker wins.
pub fn index_estimates(estimates: Vec<ProbabilityEstimate>) -> HashMap<String, ProbabilityEstimate> {
    estimates
        .into_iter()
        .map(|e| (e.ticker.clone(), e))
        .collect()
}

/// Analyse every priced market that has an estimate.
pub fn analyze_markets(
    priced: &[PricedMarket],
    estimates: &HashMap<String, ProbabilityEstimate>,
    settings: &EngineSettings,
    metrics: &mut RunMetrics,
) -> Vec<MarketAnalysis> {
    let mut analyses = Vec::with_capacity(priced.len());
    for p in priced {
        let Some(estimate) = estimates.get(&p.market.ticker) else {
            warn!("{}: no probability estimate, leaving unanalysed", p.market.ticker);
            metrics
                .errors
                .push(format!("No probability estimate for {} — skipped", p.market.ticker));
            continue;
        };
        let analysis = build_market_analysis(
            &p.market,
            &p.odds_table,
            estimate.yes_prob,
            estimate.no_prob,
            estimate.confidence,
            settings,
        );
        if !analysis.reliable {
            warn!("{}: estimate sums to zero, analysis unreliable", p.market.ticker);
            metrics
                .errors
                .push(format!("Degenerate probability estimate for {}", p.market.ticker));
        }
        analyses.push(analysis);
    }
    metrics.analyses_built += analyses.len();
    analyses
}
