//! Market data provider interface.

use async_trait::async_trait;

use crate::error::MarketDataError;
use crate::models::PriceBar;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Bars for `symbol` at `resolution` within `[start, end]` (epoch seconds),
    /// sorted by time with no duplicate timestamps.
    async fn get_candles(
        &self,
        symbol: &str,
        resolution: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<PriceBar>, MarketDataError>;
}

/// Serves a fixed set of bars, ignoring symbol and resolution.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMarketDataProvider {
    bars: Vec<PriceBar>,
}

impl InMemoryMarketDataProvider {
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.time);
        bars.dedup_by_key(|b| b.time);
        Self { bars }
    }
}

#[async_trait]
impl MarketDataProvider for InMemoryMarketDataProvider {
    async fn get_candles(
        &self,
        symbol: &str,
        _resolution: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let bars: Vec<PriceBar> = self
            .bars
            .iter()
            .filter(|b| b.time >= start && b.time <= end)
            .copied()
            .collect();
        if bars.is_empty() {
            return Err(MarketDataError::NoCandles {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }
}
