use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use tracing::info;

use kalshi_sports_edge::analysis::MarketAnalysis;
use kalshi_sports_edge::config::{Config, EngineSettings, EstimatesFormat};
use kalshi_sports_edge::market::{group_markets_by_game, GameGroup, MarketFilter};
use kalshi_sports_edge::pipeline::{
    analyze_markets, decode_estimates, decode_markets, decode_responses, index_estimates,
    price_markets, PricedMarket, RunMetrics,
};

/// Accepted layouts for the markets file: a bare array, the `/markets` list
/// response, or the single-market `/markets/{ticker}` response. Entries are
/// kept as raw JSON so each one is decoded on its own.
#[derive(Deserialize)]
#[serde(untagged)]
enum MarketsFile {
    List(Vec<Value>),
    Page { markets: Vec<Value> },
    Single { market: Value },
}

impl MarketsFile {
    fn into_entries(self) -> Vec<Value> {
        match self {
            MarketsFile::List(markets) | MarketsFile::Page { markets } => markets,
            MarketsFile::Single { market } => vec![market],
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    generated_at: DateTime<Utc>,
    settings: &'a EngineSettings,
    metrics: &'a RunMetrics,
    games: Vec<GameGroup>,
    odds_tables: &'a [PricedMarket],
    analyses: &'a [MarketAnalysis],
}

fn read_source(path: &str) -> Result<String> {
    let mut buf = String::new();
    if path == "-" {
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read markets from stdin")?;
    } else {
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut buf))
            .with_context(|| format!("failed to read {}", path))?;
    }
    Ok(buf)
}

fn load_markets(path: &str) -> Result<Vec<Value>> {
    let raw = read_source(path)?;
    let file: MarketsFile =
        serde_json::from_str(&raw).with_context(|| format!("invalid markets JSON in {}", path))?;
    Ok(file.into_entries())
}

fn load_estimates(path: &str) -> Result<Vec<Value>> {
    let raw = read_source(path)?;
    serde_json::from_str(&raw).with_context(|| format!("estimates file {} is not a JSON array", path))
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::parse();
    config.validate()?;
    let settings = config.engine_settings();
    settings.validate()?;

    let mut metrics = RunMetrics::start();

    let markets = decode_markets(load_markets(&config.markets)?, &mut metrics);
    info!("Loaded {} market(s) from {}", markets.len(), config.markets);

    let filter = MarketFilter {
        min_volume: config.min_volume,
        min_open_interest: config.min_open_interest,
        sports: config.sports.clone(),
        sports_only: config.sports_only,
        exclude_started: config.exclude_started,
    };
    let markets = filter.apply(markets, Utc::now());
    metrics.markets_after_filter = markets.len();

    let games = group_markets_by_game(&markets);
    let priced = price_markets(markets, &settings, &mut metrics);

    let analyses = match &config.estimates {
        Some(path) => {
            let entries = load_estimates(path)?;
            let estimates = match config.estimates_format {
                EstimatesFormat::Json => decode_estimates(entries, &mut metrics),
                EstimatesFormat::Edge => {
                    decode_responses(entries, config.fallback_confidence, &mut metrics)
                }
            };
            let estimates = index_estimates(estimates);
            info!("Loaded {} probability estimate(s)", estimates.len());
            analyze_markets(&priced, &estimates, &settings, &mut metrics)
        }
        None => Vec::new(),
    };

    metrics.finish();
    info!(
        "Priced {} market(s), analysed {}, {} issue(s) in {:.2}s",
        metrics.markets_priced,
        metrics.analyses_built,
        metrics.errors.len(),
        metrics.elapsed_seconds().unwrap_or_default()
    );

    let report = Report {
        generated_at: Utc::now(),
        settings: &settings,
        metrics: &metrics,
        games,
        odds_tables: &priced,
        analyses: &analyses,
    };

    let out: Box<dyn Write> = match &config.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(out);
    serde_json::to_writer_pretty(&mut out, &report).context("failed to write report")?;
    writeln!(out)?;
    out.flush()?;

    if let Some(path) = &config.output {
        info!("Report saved → {}", path);
    }
    Ok(())
}
