//! Error types for configuration, market data, CSV handling and the request pipeline.
//!
//! The brick builder, the indicator and the signal engine are infallible; every
//! failure a caller can see originates in one of the collaborators below.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("brick_size must be a positive number, got {0}")]
    InvalidBrickSize(f64),

    #[error("reversal_size must be a positive number, got {0}")]
    InvalidReversalSize(f64),

    #[error("{name} window length must be positive")]
    InvalidWindow { name: &'static str },

    #[error("Unsupported source type: {0}")]
    UnsupportedSource(String),

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Invalid date/time format: {0}")]
    InvalidDateTime(String),

    #[error("Start time must be before end time ({start} >= {end})")]
    EmptyRange { start: i64, end: i64 },

    #[error("Malformed request: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("market data API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode market data payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No candles returned for {symbol}. Check symbol/times.")]
    NoCandles { symbol: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl MarketDataError {
    /// Transport failures, throttling and server errors are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            MarketDataError::Transport(_) => true,
            MarketDataError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer flush failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum BacktestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("backtest task failed: {0}")]
    Internal(String),
}

impl From<csv::IntoInnerError<csv::Writer<Vec<u8>>>> for ExportError {
    fn from(err: csv::IntoInnerError<csv::Writer<Vec<u8>>>) -> Self {
        ExportError::Io(err.into_error())
    }
}
