//! Process settings from the environment and the per-request backtest config.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;

use crate::common::time::{ist_to_unix, resolution_seconds};
use crate::error::ConfigError;
use crate::indicators::IchimokuParams;
use crate::models::SourcePrice;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MARKET_DATA_URL: &str = "https://api.delta.exchange";

/// Deployment environment name (`ENVIRONMENT`, falling back to `ENV`).
pub fn get_environment() -> String {
    env::var("ENVIRONMENT")
        .or_else(|_| env::var("ENV"))
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn get_market_data_url() -> String {
    env::var("MARKET_DATA_URL").unwrap_or_else(|_| DEFAULT_MARKET_DATA_URL.to_string())
}

/// Everything one backtest run needs. Built fresh for every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestConfig {
    pub symbol: String,
    pub resolution: String,
    pub brick_size: f64,
    pub reversal_size: f64,
    pub source_type: SourcePrice,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub tenkan: usize,
    pub kijun: usize,
    pub span_b: usize,
    pub displacement: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            symbol: "ETHUSDT".to_string(),
            resolution: "5m".to_string(),
            brick_size: 40.0,
            reversal_size: 80.0,
            source_type: SourcePrice::Ohlc4,
            start_date: "2023-08-01".to_string(),
            start_time: "00:00:00".to_string(),
            end_date: "2023-08-02".to_string(),
            end_time: "23:59:59".to_string(),
            tenkan: 5,
            kijun: 26,
            span_b: 52,
            displacement: 26,
        }
    }
}

impl BacktestConfig {
    /// Apply the fields present in a JSON request body on top of `self`.
    ///
    /// Unknown keys are ignored; a known key with the wrong type is rejected.
    pub fn overlay(&self, body: &Value) -> Result<Self, ConfigError> {
        let mut merged = serde_json::to_value(self)
            .map_err(|e| ConfigError::Malformed(e.to_string()))?;
        if let (Value::Object(base), Value::Object(patch)) = (&mut merged, body) {
            for (key, value) in patch {
                if base.contains_key(key) {
                    base.insert(key.clone(), value.clone());
                }
            }
        } else if !body.is_null() {
            return Err(ConfigError::Malformed(
                "request body must be a JSON object".to_string(),
            ));
        }
        serde_json::from_value(merged).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    pub fn ichimoku_params(&self) -> IchimokuParams {
        IchimokuParams {
            tenkan: self.tenkan,
            kijun: self.kijun,
            span_b: self.span_b,
            displacement: self.displacement,
        }
    }

    /// Requested range as UTC epoch seconds.
    pub fn time_range(&self) -> Result<(i64, i64), ConfigError> {
        let start = ist_to_unix(&self.start_date, &self.start_time)?;
        let end = ist_to_unix(&self.end_date, &self.end_time)?;
        if start >= end {
            return Err(ConfigError::EmptyRange { start, end });
        }
        Ok((start, end))
    }

    /// Check every field the pipeline and the market data client rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_strategy()?;
        resolution_seconds(&self.resolution)?;
        self.time_range()?;
        Ok(())
    }

    /// Thresholds and window lengths only, for runs over bars already in hand.
    pub fn validate_strategy(&self) -> Result<(), ConfigError> {
        if !(self.brick_size.is_finite() && self.brick_size > 0.0) {
            return Err(ConfigError::InvalidBrickSize(self.brick_size));
        }
        if !(self.reversal_size.is_finite() && self.reversal_size > 0.0) {
            return Err(ConfigError::InvalidReversalSize(self.reversal_size));
        }
        for (name, len) in [
            ("tenkan", self.tenkan),
            ("kijun", self.kijun),
            ("span_b", self.span_b),
        ] {
            if len == 0 {
                return Err(ConfigError::InvalidWindow { name });
            }
        }
        Ok(())
    }
}
