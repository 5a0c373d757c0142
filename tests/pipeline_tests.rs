use approx::assert_relative_eq;

use kalshi_sports_edge::analysis::{Confidence, ProbabilityEstimate, Sentiment};
use kalshi_sports_edge::market::{group_markets_by_game, MarketSnapshot};
use kalshi_sports_edge::odds::{Outcome, PriceSource};
use kalshi_sports_edge::pipeline::{analyze_markets, index_estimates, price_markets, RunMetrics};
use kalshi_sports_edge::EngineSettings;

#[derive(serde::Deserialize)]
struct Page {
    markets: Vec<MarketSnapshot>,
}

fn fixture_markets() -> Vec<MarketSnapshot> {
    let page: Page = serde_json::from_str(include_str!("fixtures/markets.json")).expect("markets fixture");
    page.markets
}

fn fixture_estimates() -> Vec<ProbabilityEstimate> {
    serde_json::from_str(include_str!("fixtures/estimates.json")).expect("estimates fixture")
}

#[test]
fn batch_run_over_fixture() {
    let settings = EngineSettings::default();
    let mut metrics = RunMetrics::start();

    let markets = fixture_markets();
    assert_eq!(markets.len(), 4);
    let games = group_markets_by_game(&markets);
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].team_a_name, "Cleveland");
    assert_eq!(games[0].team_b_name, "Oklahoma City");
    assert_eq!(games[0].combined_volume, 13_670);

    let priced = price_markets(markets, &settings, &mut metrics);
    assert_eq!(priced.len(), 3);
    assert_eq!(metrics.markets_skipped, 1);
    assert_eq!(
        metrics.errors,
        vec!["No price data for KXEPLGAME-26FEB23ARSCHE-ARS — skipped".to_string()]
    );
    for p in &priced {
        let t = &p.odds_table;
        assert_eq!(u16::from(t.yes_row.price_cents) + u16::from(t.no_row.price_cents), 100);
    }

    let estimates = index_estimates(fixture_estimates());
    let analyses = analyze_markets(&priced, &estimates, &settings, &mut metrics);
    assert_eq!(analyses.len(), 3);
    assert_eq!(metrics.errors.len(), 1);

    let okc = &analyses[0];
    assert_eq!(okc.odds_table.price_source, PriceSource::Mid);
    assert_eq!(okc.odds_table.yes_row.price_cents, 46);
    assert_relative_eq!(okc.yes_edge, 0.12, epsilon = 1e-9);
    assert_relative_eq!(okc.yes_ev, 0.2609, epsilon = 1e-4);
    assert_eq!(okc.best_side, Outcome::Yes);
    assert_eq!(okc.sentiment, Sentiment::Bullish);
    assert_eq!(okc.confidence, Confidence::High);

    let cle = &analyses[1];
    assert!(cle.odds_table.wide_spread);
    assert_eq!(cle.odds_table.yes_row.price_cents, 47);
    assert_eq!(cle.best_side, Outcome::No);
    assert_eq!(cle.sentiment, Sentiment::Neutral);
    assert_eq!(cle.confidence, Confidence::Medium);

    let bos = &analyses[2];
    assert_eq!(bos.odds_table.price_source, PriceSource::Last);
    assert_relative_eq!(bos.llm_yes_prob + bos.llm_no_prob, 1.0, epsilon = 1e-12);
    assert_eq!(bos.sentiment, Sentiment::Bullish);
    assert_eq!(bos.confidence, Confidence::Low);
}

#[test]
fn analysis_serializes_with_wire_labels() {
    let settings = EngineSettings::default();
    let mut metrics = RunMetrics::start();
    let priced = price_markets(fixture_markets(), &settings, &mut metrics);
    let estimates = index_estimates(fixture_estimates());
    let analyses = analyze_markets(&priced, &estimates, &settings, &mut metrics);

    let json = serde_json::to_value(&analyses[0]).unwrap();
    assert_eq!(json["best_side"], "YES");
    assert_eq!(json["sentiment"], "Bullish");
    assert_eq!(json["confidence"], "High");
    assert_eq!(json["odds_table"]["price_source"], "mid");
    assert_eq!(json["odds_table"]["yes_row"]["fractional_str"], "27/23");
    assert!(json["odds_table"]["yes_row"]["edge"].is_f64());
}
