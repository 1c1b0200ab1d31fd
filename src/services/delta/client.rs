//! REST client for the candle history endpoint.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::header::{ACCEPT, USER_AGENT};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::messages::CandleHistoryResponse;
use crate::common::time::resolution_seconds;
use crate::error::{ConfigError, MarketDataError};
use crate::models::PriceBar;
use crate::services::market_data::MarketDataProvider;

pub const DEFAULT_CANDLE_LIMIT: i64 = 4000;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const WINDOW_PAUSE: Duration = Duration::from_millis(20);
const MAX_RETRIES: usize = 3;

/// Split `[start, end]` into consecutive inclusive windows of at most `span`
/// seconds each.
pub fn request_windows(start: i64, end: i64, span: i64) -> Vec<(i64, i64)> {
    let mut windows = Vec::new();
    if span <= 0 {
        return windows;
    }
    let mut cursor = start;
    while cursor <= end {
        let window_end = end.min(cursor.saturating_add(span - 1));
        windows.push((cursor, window_end));
        match window_end.checked_add(1) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    windows
}

pub struct DeltaRestClient {
    base_url: String,
    http: reqwest::Client,
    limit: i64,
    window_pause: Duration,
}

impl DeltaRestClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, MarketDataError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(base_url, http))
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            limit: DEFAULT_CANDLE_LIMIT,
            window_pause: WINDOW_PAUSE,
        }
    }

    /// Candles requested per call; also sizes the request windows.
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn with_window_pause(mut self, pause: Duration) -> Self {
        self.window_pause = pause;
        self
    }

    async fn fetch_window(
        &self,
        symbol: &str,
        resolution: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let url = format!("{}/v2/history/candles", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("symbol", symbol.to_string()),
                ("resolution", resolution.to_string()),
                ("start", start.to_string()),
                ("end", end.to_string()),
                ("limit", self.limit.to_string()),
            ])
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("brickcloud/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(MarketDataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: CandleHistoryResponse = serde_json::from_str(&body)?;
        Ok(payload.into_bars())
    }
}

#[async_trait]
impl MarketDataProvider for DeltaRestClient {
    async fn get_candles(
        &self,
        symbol: &str,
        resolution: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<PriceBar>, MarketDataError> {
        let span = self
            .limit
            .checked_mul(resolution_seconds(resolution)?)
            .ok_or_else(|| ConfigError::InvalidResolution(resolution.to_string()))?;
        let windows = request_windows(start, end, span);
        let mut bars = Vec::new();

        for (i, &(window_start, window_end)) in windows.iter().enumerate() {
            if i > 0 && !self.window_pause.is_zero() {
                tokio::time::sleep(self.window_pause).await;
            }

            let fetched = (|| self.fetch_window(symbol, resolution, window_start, window_end))
                .retry(
                    ExponentialBuilder::default()
                        .with_min_delay(Duration::from_millis(200))
                        .with_max_times(MAX_RETRIES),
                )
                .when(|e: &MarketDataError| e.is_retryable())
                .notify(|e: &MarketDataError, delay: Duration| {
                    warn!(
                        symbol = %symbol,
                        window_start,
                        window_end,
                        error = %e,
                        "candle request failed, retrying in {:?}",
                        delay
                    );
                })
                .await?;

            debug!(
                symbol = %symbol,
                resolution = %resolution,
                window_start,
                window_end,
                count = fetched.len(),
                "fetched candle window"
            );
            bars.extend(fetched);
        }

        bars.sort_by_key(|b| b.time);
        bars.dedup_by_key(|b| b.time);

        if bars.is_empty() {
            return Err(MarketDataError::NoCandles {
                symbol: symbol.to_string(),
            });
        }

        info!(
            symbol = %symbol,
            resolution = %resolution,
            windows = windows.len(),
            count = bars.len(),
            "fetched candles"
        );
        Ok(bars)
    }
}
