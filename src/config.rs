use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::analysis::Confidence;
use crate::market::Sport;
use crate::odds::PriceSource;

/// Default bid/ask gap (cents) above which a quote is flagged as wide.
pub const WIDE_SPREAD_THRESHOLD: u8 = 10;
/// Default minimum |edge| for a Bullish/Bearish call.
pub const EDGE_THRESHOLD_DEFAULT: f64 = 0.05;
/// Probability pairs whose sum is further than this from 1.0 get rescaled.
pub const NORMALIZATION_TOLERANCE: f64 = 0.01;
/// Below this volume (contracts) confidence is forced to Low.
pub const LOW_VOLUME_FLOOR: u64 = 500;
/// Below this volume (contracts) a High confidence is capped at Medium.
pub const MEDIUM_VOLUME_FLOOR: u64 = 1_000;

/// How the estimates file is laid out.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EstimatesFormat {
    /// `[{"ticker", "yes_prob", "no_prob", "confidence"}]`
    #[default]
    Json,
    /// `[{"ticker", "response"}]` holding the model's raw tagged answer
    Edge,
}

/// Kalshi sports market odds and edge analyzer
#[derive(Parser, Debug, Clone)]
#[command(name = "kalshi-sports-edge", version, about)]
pub struct Config {
    /// Markets JSON file (Kalshi API market objects); "-" reads stdin
    #[arg(long, env = "MARKETS_PATH", default_value = "-")]
    pub markets: String,

    /// Probability estimates JSON file (one entry per ticker)
    #[arg(long, env = "ESTIMATES_PATH")]
    pub estimates: Option<String>,

    /// Layout of the estimates file
    #[arg(long, env = "ESTIMATES_FORMAT", value_enum, default_value_t = EstimatesFormat::Json)]
    pub estimates_format: EstimatesFormat,

    /// Confidence assumed when a model response states none
    #[arg(long, env = "FALLBACK_CONFIDENCE", default_value = "medium")]
    pub fallback_confidence: Confidence,

    /// Preferred price tier: mid, last, ask or bid
    #[arg(long, env = "PRICE_SOURCE", default_value = "mid")]
    pub price_source: PriceSource,

    /// Bid/ask spread (cents) above which the quote is flagged as wide
    #[arg(long, env = "WIDE_SPREAD_THRESHOLD", default_value_t = WIDE_SPREAD_THRESHOLD)]
    pub wide_spread_threshold: u8,

    /// Minimum edge for a Bullish/Bearish classification (e.g. 0.05 = 5%)
    #[arg(long, env = "EDGE_THRESHOLD", default_value_t = EDGE_THRESHOLD_DEFAULT)]
    pub edge_threshold: f64,

    /// Estimate pairs whose sum is further than this from 1.0 are rescaled
    #[arg(long, env = "NORMALIZATION_TOLERANCE", default_value_t = NORMALIZATION_TOLERANCE)]
    pub normalization_tolerance: f64,

    /// Below this volume confidence is forced to Low
    #[arg(long, env = "LOW_VOLUME_FLOOR", default_value_t = LOW_VOLUME_FLOOR)]
    pub low_volume_floor: u64,

    /// Below this volume a High confidence is capped at Medium
    #[arg(long, env = "MEDIUM_VOLUME_FLOOR", default_value_t = MEDIUM_VOLUME_FLOOR)]
    pub medium_volume_floor: u64,

    /// Minimum traded volume (contracts)
    #[arg(long, env = "MIN_VOLUME", default_value = "0")]
    pub min_volume: u64,

    /// Minimum open interest (contracts)
    #[arg(long, env = "MIN_OPEN_INTEREST", default_value = "0")]
    pub min_open_interest: u64,

    /// Restrict to these sports (repeatable)
    #[arg(long = "sport")]
    pub sports: Vec<Sport>,

    /// Drop markets that are not recognised as individual sports games
    #[arg(long, env = "SPORTS_ONLY", default_value = "false")]
    pub sports_only: bool,

    /// Drop games whose estimated start time has already passed
    #[arg(long, env = "EXCLUDE_STARTED", default_value = "false")]
    pub exclude_started: bool,

    /// Write the JSON report here instead of stdout
    #[arg(long, env = "OUTPUT_PATH")]
    pub output: Option<String>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.engine_settings().validate()?;
        if self.wide_spread_threshold >= 100 {
            anyhow::bail!("wide_spread_threshold must be below 100 cents");
        }
        if self.markets.trim().is_empty() {
            anyhow::bail!("--markets must name a file or \"-\" for stdin");
        }
        Ok(())
    }

    /// Thresholds handed to the odds engine and the analysis calculator.
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            preferred_source: self.price_source,
            wide_spread_threshold: self.wide_spread_threshold,
            edge_threshold: self.edge_threshold,
            normalization_tolerance: self.normalization_tolerance,
            low_volume_floor: self.low_volume_floor,
            medium_volume_floor: self.medium_volume_floor,
        }
    }
}

/// Tunable constants for the odds engine and the edge/EV calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub preferred_source: PriceSource,
    pub wide_spread_threshold: u8,
    pub edge_threshold: f64,
    pub normalization_tolerance: f64,
    pub low_volume_floor: u64,
    pub medium_volume_floor: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            preferred_source: PriceSource::Mid,
            wide_spread_threshold: WIDE_SPREAD_THRESHOLD,
            edge_threshold: EDGE_THRESHOLD_DEFAULT,
            normalization_tolerance: NORMALIZATION_TOLERANCE,
            low_volume_floor: LOW_VOLUME_FLOOR,
            medium_volume_floor: MEDIUM_VOLUME_FLOOR,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.edge_threshold) {
            anyhow::bail!("edge_threshold must be between 0.0 and 1.0");
        }
        if self.normalization_tolerance.is_nan() || self.normalization_tolerance < 0.0 {
            anyhow::bail!("normalization_tolerance must be non-negative");
        }
        if self.low_volume_floor > self.medium_volume_floor {
            anyhow::bail!("low_volume_floor must not exceed medium_volume_floor");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let config = Config::parse_from(["kalshi-sports-edge"]);
        config.validate().unwrap();
        let settings = config.engine_settings();
        assert_eq!(settings, EngineSettings::default());
        assert_eq!(settings.wide_spread_threshold, 10);
        assert_eq!(config.markets, "-");
    }

    #[test]
    fn parses_sport_and_source_flags() {
        let config = Config::parse_from([
            "kalshi-sports-edge",
            "--price-source",
            "last",
            "--sport",
            "soccer",
            "--sport",
            "tennis",
        ]);
        assert_eq!(config.price_source, PriceSource::Last);
        assert_eq!(config.sports, vec![Sport::Soccer, Sport::Tennis]);
    }

    #[test]
    fn rejects_out_of_range_edge_threshold() {
        let config = Config::parse_from(["kalshi-sports-edge", "--edge-threshold", "1.5"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn settings_reject_inverted_volume_floors() {
        let settings = EngineSettings {
            low_volume_floor: 2_000,
            ..EngineSettings::default()
        };
        assert!(settings.validate().is_err());
        assert!(EngineSettings::default().validate().is_ok());
    }

    #[test]
    fn every_engine_threshold_has_a_flag() {
        let config = Config::parse_from([
            "kalshi-sports-edge",
            "--normalization-tolerance",
            "0.05",
            "--low-volume-floor",
            "100",
            "--medium-volume-floor",
            "250",
            "--estimates-format",
            "edge",
            "--fallback-confidence",
            "LOW",
        ]);
        config.validate().unwrap();
        let settings = config.engine_settings();
        assert_eq!(settings.normalization_tolerance, 0.05);
        assert_eq!(settings.low_volume_floor, 100);
        assert_eq!(settings.medium_volume_floor, 250);
        assert_eq!(config.estimates_format, EstimatesFormat::Edge);
        assert_eq!(config.fallback_confidence, Confidence::Low);
    }

    #[test]
    fn rejects_negative_tolerance_and_inverted_floors() {
        let config = Config::parse_from(["kalshi-sports-edge", "--normalization-tolerance=-0.1"]);
        assert!(config.validate().is_err());
        let config = Config::parse_from(["kalshi-sports-edge", "--low-volume-floor", "5000"]);
        assert!(config.validate().is_err());
    }
}
