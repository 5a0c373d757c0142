//! Probability estimates supplied by an outside model.
//!
//! The estimator (typically an LLM call) is out of process; this module only
//! holds its output and reads the formats it answers in: a JSON record per
//! ticker, or the raw tagged response (`<edge>` and `<recommend>` blocks).

use serde::{Deserialize, Serialize};

use super::Confidence;
use crate::odds::Outcome;

/// "True" probabilities for one market, as estimated externally.
///
/// Deserialisation rejects probabilities outside `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEstimate")]
pub struct ProbabilityEstimate {
    pub ticker: String,
    pub yes_prob: f64,
    pub no_prob: f64,
    pub confidence: Confidence,
}

#[derive(Deserialize)]
struct RawEstimate {
    ticker: String,
    #[serde(alias = "llm_yes_prob")]
    yes_prob: f64,
    #[serde(alias = "llm_no_prob")]
    no_prob: f64,
    #[serde(alias = "stated_confidence")]
    confidence: Confidence,
}

impl TryFrom<RawEstimate> for ProbabilityEstimate {
    type Error = EstimateError;

    fn try_from(raw: RawEstimate) -> Result<Self, Self::Error> {
        Ok(ProbabilityEstimate {
            yes_prob: check_probability(Outcome::Yes, raw.yes_prob)?,
            no_prob: check_probability(Outcome::No, raw.no_prob)?,
            ticker: raw.ticker,
            confidence: raw.confidence,
        })
    }
}

fn check_probability(side: Outcome, value: f64) -> Result<f64, EstimateError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EstimateError::OutOfRange { side, value })
    }
}

/// Probability pair after the sum check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedProbabilities {
    pub yes_prob: f64,
    pub no_prob: f64,
    /// False when the pair summed to zero and could not be rescaled.
    pub reliable: bool,
}

/// Rescale a YES/NO pair so it sums to 1.0 when it is off by more than
/// `tolerance`. A zero sum is left untouched and marked unreliable.
pub fn normalize_probabilities(yes_prob: f64, no_prob: f64, tolerance: f64) -> NormalizedProbabilities {
    let total = yes_prob + no_prob;
    if total == 0.0 {
        return NormalizedProbabilities {
            yes_prob,
            no_prob,
            reliable: false,
        };
    }
    if (total - 1.0).abs() > tolerance {
        NormalizedProbabilities {
            yes_prob: yes_prob / total,
            no_prob: no_prob / total,
            reliable: true,
        }
    } else {
        NormalizedProbabilities {
            yes_prob,
            no_prob,
            reliable: true,
        }
    }
}

impl ProbabilityEstimate {
    pub fn normalized(&self, tolerance: f64) -> NormalizedProbabilities {
        normalize_probabilities(self.yes_prob, self.no_prob, tolerance)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimateError {
    #[error("no true_prob line for {0}")]
    MissingSide(Outcome),

    #[error("unreadable probability '{value}' for {side}")]
    InvalidProbability { side: Outcome, value: String },

    #[error("probability {value} for {side} is outside [0, 1]")]
    OutOfRange { side: Outcome, value: f64 },
}

/// Read an `<edge>` answer block of the form
///
/// ```text
/// YES: true_prob=0.58 implied=0.460 edge=+0.120
/// NO:  true_prob=0.42 implied=0.540 edge=-0.120
/// Confidence: HIGH
/// ```
///
/// The confidence line is optional; `fallback_confidence` is used without it.
pub fn parse_edge_block(
    ticker: &str,
    text: &str,
    fallback_confidence: Confidence,
) -> Result<ProbabilityEstimate, EstimateError> {
    let yes_prob = side_probability(text, Outcome::Yes)?;
    let no_prob = side_probability(text, Outcome::No)?;
    let confidence = text
        .lines()
        .filter_map(|line| {
            let (label, value) = line.split_once(':')?;
            label.trim().eq_ignore_ascii_case("confidence").then_some(value)
        })
        .find_map(|value| value.split_whitespace().next()?.parse::<Confidence>().ok())
        .unwrap_or(fallback_confidence);

    Ok(ProbabilityEstimate {
        ticker: ticker.to_string(),
        yes_prob,
        no_prob,
        confidence,
    })
}

fn side_probability(text: &str, side: Outcome) -> Result<f64, EstimateError> {
    let rest = text
        .lines()
        .find_map(|line| {
            let (label, rest) = line.trim().split_once(':')?;
            label.trim().eq_ignore_ascii_case(side.as_str()).then_some(rest)
        })
        .ok_or(EstimateError::MissingSide(side))?;

    let lower = rest.to_ascii_lowercase();
    let start = lower
        .find("true_prob=")
        .ok_or(EstimateError::MissingSide(side))?
        + "true_prob=".len();
    let raw = rest[start..]
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_matches(|c| c == '[' || c == ']');
    let value: f64 = raw.parse().map_err(|_| EstimateError::InvalidProbability {
        side,
        value: raw.to_string(),
    })?;
    check_probability(side, value)
}

/// Read `RECOMMENDED POSITION: YES — Edge: 12.0% — ...` into a side and a
/// fractional edge. `PASS` or any other text yields `None`.
pub fn parse_recommendation(text: &str) -> Option<(Outcome, f64)> {
    const MARKER: &str = "RECOMMENDED POSITION:";
    text.lines().find_map(|line| {
        let upper = line.to_ascii_uppercase();
        let after = upper[upper.find(MARKER)? + MARKER.len()..].trim_start();
        let side = if after.starts_with("YES") {
            Outcome::Yes
        } else if after.starts_with("NO") {
            Outcome::No
        } else {
            return None;
        };
        let edge_text = after[after.find("EDGE:")? + "EDGE:".len()..].trim_start();
        let digits: String = edge_text
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if !edge_text[digits.len()..].starts_with('%') {
            return None;
        }
        let pct: f64 = digits.parse().ok()?;
        Some((side, pct / 100.0))
    })
}

/// Body of the first `<tag>...</tag>` block, trimmed.
pub fn extract_tag<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = text.find(&open)? + open.len();
    let len = text[start..].find(&close)?;
    Some(text[start..start + len].trim())
}

/// A full tagged model response, reduced to what the analysis needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub estimate: ProbabilityEstimate,
    /// The model's own call, if it made one. Informational only.
    pub recommendation: Option<(Outcome, f64)>,
}

/// Read a raw model answer: the `<edge>` block carries the probabilities
/// (the whole text is tried when the tag is missing) and the `<recommend>`
/// block an optional position.
pub fn parse_response(
    ticker: &str,
    raw: &str,
    fallback_confidence: Confidence,
) -> Result<ParsedResponse, EstimateError> {
    let edge = extract_tag(raw, "edge").unwrap_or(raw);
    let estimate = parse_edge_block(ticker, edge, fallback_confidence)?;
    let recommendation = extract_tag(raw, "recommend").and_then(parse_recommendation);
    Ok(ParsedResponse {
        estimate,
        recommendation,
    })
}
