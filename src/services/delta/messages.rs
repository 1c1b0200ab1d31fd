//! Candle history payloads.
//!
//! Rows arrive either as arrays `[time, open, high, low, close, volume?]` or
//! as objects with the same field names. Prices may be numbers, numeric
//! strings or null.

use serde::Deserialize;
use serde_json::Value;

use crate::models::PriceBar;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandleHistoryResponse {
    #[serde(default)]
    pub result: Option<Vec<Value>>,
}

impl CandleHistoryResponse {
    /// Usable bars in payload order. Rows without a timestamp and all-zero
    /// placeholder rows are dropped.
    pub fn into_bars(self) -> Vec<PriceBar> {
        self.result
            .unwrap_or_default()
            .iter()
            .filter_map(parse_candle)
            .filter(|bar| !bar.is_empty_quote())
            .collect()
    }
}

fn number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn timestamp(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn parse_candle(item: &Value) -> Option<PriceBar> {
    match item {
        Value::Array(fields) if fields.len() >= 5 => Some(PriceBar {
            time: timestamp(fields.first())?,
            open: number(fields.get(1)),
            high: number(fields.get(2)),
            low: number(fields.get(3)),
            close: number(fields.get(4)),
            volume: number(fields.get(5)),
        }),
        Value::Object(map) => Some(PriceBar {
            time: timestamp(map.get("time"))?,
            open: number(map.get("open")),
            high: number(map.get("high")),
            low: number(map.get("low")),
            close: number(map.get("close")),
            volume: number(map.get("volume")),
        }),
        _ => None,
    }
}
