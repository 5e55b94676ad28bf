//! How a raw sample is turned into an emitted value.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Point-in-time value, emitted as sampled.
    Gauge,
    /// Change per second since the previous run.
    Rate,
    /// Change since the previous run.
    Delta,
    /// Descriptive value, emitted as a string.
    Attribute,
}

impl SourceType {
    /// Whether the value depends on a previously cached sample.
    pub fn is_cumulative(self) -> bool {
        matches!(self, SourceType::Rate | SourceType::Delta)
    }
}

impl std::str::FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gauge" => Ok(SourceType::Gauge),
            "rate" => Ok(SourceType::Rate),
            "delta" => Ok(SourceType::Delta),
            "attribute" | "attr" => Ok(SourceType::Attribute),
            _ => Err(format!("unknown source type: {}", s)),
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Gauge => write!(f, "gauge"),
            SourceType::Rate => write!(f, "rate"),
            SourceType::Delta => write!(f, "delta"),
            SourceType::Attribute => write!(f, "attribute"),
        }
    }
}
