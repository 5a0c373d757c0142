use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::EngineSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Neutral,
    Bearish,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Bullish => "Bullish",
            Sentiment::Neutral => "Neutral",
            Sentiment::Bearish => "Bearish",
        };
        f.write_str(label)
    }
}

/// Confidence in an estimate. Ordered Low < Medium < High.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown confidence label '{0}' (expected High, Medium or Low)")]
pub struct UnknownConfidence(pub String);

impl FromStr for Confidence {
    type Err = UnknownConfidence;

    /// Accepts any case, so the "HIGH / MEDIUM / LOW" labels models tend to
    /// emit parse directly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Confidence::High),
            "medium" | "med" => Ok(Confidence::Medium),
            "low" => Ok(Confidence::Low),
            _ => Err(UnknownConfidence(s.to_string())),
        }
    }
}

impl TryFrom<String> for Confidence {
    type Error = UnknownConfidence;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Bullish at `best_edge >= threshold`, Bearish at `<= -threshold`, both
/// boundaries inclusive.
pub fn classify_sentiment(best_edge: f64, threshold: f64) -> Sentiment {
    if best_edge >= threshold {
        Sentiment::Bullish
    } else if best_edge <= -threshold {
        Sentiment::Bearish
    } else {
        Sentiment::Neutral
    }
}

/// Cap stated confidence by market liquidity.
///
/// Below the low-volume floor the result is always Low; below the medium
/// floor a High is downgraded to Medium.
pub fn adjust_confidence(stated: Confidence, volume: u64, settings: &EngineSettings) -> Confidence {
    if volume < settings.low_volume_floor {
        Confidence::Low
    } else if volume < settings.medium_volume_floor && stated == Confidence::High {
        Confidence::Medium
    } else {
        stated
    }
}
