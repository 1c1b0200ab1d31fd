//! CSV and JSON row encoders for bricks, trades, decision logs and summaries.

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::str::FromStr;

use crate::backtest::{BacktestResult, BacktestSummary};
use crate::config::BacktestConfig;
use crate::error::ExportError;
use crate::models::{Action, Brick, IchimokuLines, LogEntry, PositionSide, PriceBar, Trade};

pub const BRICK_HEADER: [&str; 16] = [
    "brick_time",
    "brick_start_time",
    "src_open",
    "src_high",
    "src_low",
    "src_close",
    "open",
    "high",
    "low",
    "close",
    "dir",
    "reversal",
    "tenkan",
    "kijun",
    "span_a",
    "span_b",
];

pub const TRADE_HEADER: [&str; 6] = [
    "entry_time",
    "entry_price",
    "exit_time",
    "exit_price",
    "direction",
    "profit",
];

pub const LOG_HEADER: [&str; 13] = [
    "time",
    "action",
    "reason",
    "close",
    "kijun",
    "cloud_top",
    "cloud_bottom",
    "long_entry_signal",
    "long_exit_signal",
    "short_entry_signal",
    "short_exit_signal",
    "position",
    "available_bricks",
];

pub const SUMMARY_HEADER: [&str; 5] = [
    "total_trades",
    "total_profit",
    "winning_trades",
    "losing_trades",
    "max_drawdown",
];

/// Downloadable CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvKind {
    Renko,
    Trades,
    Logs,
    Summary,
}

impl CsvKind {
    pub const ALL: [CsvKind; 4] = [CsvKind::Renko, CsvKind::Trades, CsvKind::Logs, CsvKind::Summary];

    pub fn as_str(self) -> &'static str {
        match self {
            CsvKind::Renko => "renko",
            CsvKind::Trades => "trades",
            CsvKind::Logs => "logs",
            CsvKind::Summary => "summary",
        }
    }

    /// Key of this file in JSON responses.
    pub fn response_key(self) -> String {
        format!("{}_data", self.as_str())
    }

    /// `<kind>_<symbol>_<start_date>_to_<end_date>.csv`
    pub fn filename(self, config: &BacktestConfig) -> String {
        format!(
            "{}_{}_{}_to_{}.csv",
            self.as_str(),
            config.symbol,
            config.start_date,
            config.end_date
        )
    }

    pub fn render(self, result: &BacktestResult) -> Result<String, ExportError> {
        match self {
            CsvKind::Renko => bricks_to_csv(&result.bricks, &result.lines),
            CsvKind::Trades => trades_to_csv(&result.trades),
            CsvKind::Logs => logs_to_csv(&result.logs),
            CsvKind::Summary => summary_to_csv(&result.summary),
        }
    }
}

impl FromStr for CsvKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "renko" => Ok(CsvKind::Renko),
            "trades" => Ok(CsvKind::Trades),
            "logs" => Ok(CsvKind::Logs),
            "summary" => Ok(CsvKind::Summary),
            other => Err(format!("Unknown file_type: {}", other)),
        }
    }
}

fn defined(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

fn line_value(line: &[f64], i: usize) -> Option<f64> {
    line.get(i).copied().and_then(defined)
}

/// A brick joined with its indicator values, as sent in JSON responses.
#[derive(Debug, Serialize)]
pub struct BrickRow<'a> {
    #[serde(flatten)]
    pub brick: &'a Brick,
    pub tenkan: Option<f64>,
    pub kijun: Option<f64>,
    pub span_a: Option<f64>,
    pub span_b: Option<f64>,
    pub chikou: Option<f64>,
}

pub fn brick_rows<'a>(bricks: &'a [Brick], lines: &IchimokuLines) -> Vec<BrickRow<'a>> {
    bricks
        .iter()
        .enumerate()
        .map(|(i, brick)| BrickRow {
            brick,
            tenkan: line_value(&lines.tenkan, i),
            kijun: line_value(&lines.kijun, i),
            span_a: line_value(&lines.span_a, i),
            span_b: line_value(&lines.span_b, i),
            chikou: line_value(&lines.chikou, i),
        })
        .collect()
}

#[derive(Serialize)]
struct BrickCsvRow {
    brick_time: i64,
    brick_start_time: i64,
    src_open: f64,
    src_high: f64,
    src_low: f64,
    src_close: f64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    dir: i8,
    reversal: bool,
    tenkan: Option<f64>,
    kijun: Option<f64>,
    span_a: Option<f64>,
    span_b: Option<f64>,
}

#[derive(Serialize)]
struct LogCsvRow<'a> {
    time: i64,
    action: Action,
    reason: &'a str,
    close: f64,
    kijun: Option<f64>,
    cloud_top: Option<f64>,
    cloud_bottom: Option<f64>,
    long_entry_signal: bool,
    long_exit_signal: bool,
    short_entry_signal: bool,
    short_exit_signal: bool,
    position: PositionSide,
    available_bricks: usize,
}

#[derive(Serialize)]
struct SummaryCsvRow {
    total_trades: usize,
    total_profit: f64,
    winning_trades: usize,
    losing_trades: usize,
    max_drawdown: f64,
}

fn write_csv<R, I>(header: &[&str], rows: I) -> Result<String, ExportError>
where
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    // Header written by hand so an empty table still carries it.
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

pub fn bricks_to_csv(bricks: &[Brick], lines: &IchimokuLines) -> Result<String, ExportError> {
    let rows = bricks.iter().enumerate().map(|(i, b)| BrickCsvRow {
        brick_time: b.brick_time,
        brick_start_time: b.brick_start_time,
        src_open: b.src_open,
        src_high: b.src_high,
        src_low: b.src_low,
        src_close: b.src_close,
        open: b.open,
        high: b.high,
        low: b.low,
        close: b.close,
        dir: b.dir,
        reversal: b.reversal,
        tenkan: line_value(&lines.tenkan, i),
        kijun: line_value(&lines.kijun, i),
        span_a: line_value(&lines.span_a, i),
        span_b: line_value(&lines.span_b, i),
    });
    write_csv(&BRICK_HEADER, rows)
}

pub fn trades_to_csv(trades: &[Trade]) -> Result<String, ExportError> {
    write_csv(&TRADE_HEADER, trades)
}

pub fn logs_to_csv(logs: &[LogEntry]) -> Result<String, ExportError> {
    let rows = logs.iter().map(|l| LogCsvRow {
        time: l.time,
        action: l.action,
        reason: &l.reason,
        close: l.close,
        kijun: defined(l.kijun),
        cloud_top: defined(l.cloud_top),
        cloud_bottom: defined(l.cloud_bottom),
        long_entry_signal: l.long_entry_signal,
        long_exit_signal: l.long_exit_signal,
        short_entry_signal: l.short_entry_signal,
        short_exit_signal: l.short_exit_signal,
        position: l.position,
        available_bricks: l.available_bricks,
    });
    write_csv(&LOG_HEADER, rows)
}

pub fn summary_to_csv(summary: &BacktestSummary) -> Result<String, ExportError> {
    let row = SummaryCsvRow {
        total_trades: summary.trades,
        total_profit: summary.total_profit,
        winning_trades: summary.winning_trades,
        losing_trades: summary.losing_trades,
        max_drawdown: summary.max_drawdown,
    };
    write_csv(&SUMMARY_HEADER, [row])
}

/// Read bars from a CSV with a `time,open,high,low,close[,volume]` header.
///
/// Rows whose four prices are all zero are dropped; the rest come back sorted
/// by time with duplicate timestamps removed.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<PriceBar>, ExportError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    for row in reader.deserialize() {
        let bar: PriceBar = row?;
        if !bar.is_empty_quote() {
            bars.push(bar);
        }
    }
    bars.sort_by_key(|b| b.time);
    bars.dedup_by_key(|b| b.time);
    Ok(bars)
}
