use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// One OHLCV bar, timestamped in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl PriceBar {
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// A bar whose four prices all equal `price`.
    pub fn flat(time: i64, price: f64) -> Self {
        Self::new(time, price, price, price, price, 0.0)
    }

    /// Placeholder rows some venues emit for empty intervals.
    pub fn is_empty_quote(&self) -> bool {
        self.open == 0.0 && self.high == 0.0 && self.low == 0.0 && self.close == 0.0
    }
}

/// Which scalar of a bar drives the brick builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum SourcePrice {
    Close,
    Open,
    High,
    Low,
    Hl2,
    Hlc3,
    #[default]
    Ohlc4,
}

impl SourcePrice {
    pub fn price(self, bar: &PriceBar) -> f64 {
        match self {
            SourcePrice::Close => bar.close,
            SourcePrice::Open => bar.open,
            SourcePrice::High => bar.high,
            SourcePrice::Low => bar.low,
            SourcePrice::Hl2 => (bar.high + bar.low) / 2.0,
            SourcePrice::Hlc3 => (bar.high + bar.low + bar.close) / 3.0,
            SourcePrice::Ohlc4 => (bar.open + bar.high + bar.low + bar.close) / 4.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourcePrice::Close => "close",
            SourcePrice::Open => "open",
            SourcePrice::High => "high",
            SourcePrice::Low => "low",
            SourcePrice::Hl2 => "hl2",
            SourcePrice::Hlc3 => "hlc3",
            SourcePrice::Ohlc4 => "ohlc4",
        }
    }
}

impl fmt::Display for SourcePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourcePrice {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "close" => Ok(SourcePrice::Close),
            "open" => Ok(SourcePrice::Open),
            "high" => Ok(SourcePrice::High),
            "low" => Ok(SourcePrice::Low),
            "hl2" => Ok(SourcePrice::Hl2),
            "hlc3" => Ok(SourcePrice::Hlc3),
            "ohlc4" => Ok(SourcePrice::Ohlc4),
            _ => Err(ConfigError::UnsupportedSource(s.to_string())),
        }
    }
}

impl TryFrom<String> for SourcePrice {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
