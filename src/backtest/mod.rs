//! The request-scoped pipeline: bars -> bricks -> cloud -> trades and logs.

use serde::Serialize;
use tracing::debug;

use crate::config::BacktestConfig;
use crate::indicators::{ichimoku_on_bricks, BrickBuilder};
use crate::models::{Brick, IchimokuLines, LogEntry, PriceBar, Trade};
use crate::signals::SignalEngine;

/// Aggregate figures over the trade ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestSummary {
    pub renko_bricks: usize,
    pub trades: usize,
    pub net_profit: f64,
    pub total_profit: f64,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub max_drawdown: f64,
}

impl BacktestSummary {
    pub fn from_trades(renko_bricks: usize, trades: &[Trade]) -> Self {
        let mut total_profit = 0.0;
        let mut winning_trades = 0;
        let mut peak = 0.0_f64;
        let mut max_drawdown = 0.0_f64;

        for trade in trades {
            total_profit += trade.profit;
            if trade.profit > 0.0 {
                winning_trades += 1;
            }
            peak = peak.max(total_profit);
            max_drawdown = max_drawdown.max(peak - total_profit);
        }

        Self {
            renko_bricks,
            trades: trades.len(),
            net_profit: (total_profit * 100.0).round() / 100.0,
            total_profit,
            winning_trades,
            losing_trades: trades.len() - winning_trades,
            max_drawdown,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub bricks: Vec<Brick>,
    pub lines: IchimokuLines,
    pub trades: Vec<Trade>,
    pub logs: Vec<LogEntry>,
    pub summary: BacktestSummary,
}

/// Run the full pipeline over `bars`.
///
/// `config` must already have passed [`BacktestConfig::validate_strategy`].
pub fn run(bars: &[PriceBar], config: &BacktestConfig) -> BacktestResult {
    let bricks = BrickBuilder::new(config.brick_size, config.reversal_size)
        .with_source(config.source_type)
        .build(bars);

    let params = config.ichimoku_params();
    let lines = ichimoku_on_bricks(&bricks, &params);
    let outcome = SignalEngine::new(params).run(&bricks, &lines);
    let summary = BacktestSummary::from_trades(bricks.len(), &outcome.trades);

    debug!(
        bars = bars.len(),
        bricks = bricks.len(),
        trades = outcome.trades.len(),
        net_profit = summary.net_profit,
        "backtest pipeline complete"
    );

    BacktestResult {
        bricks,
        lines,
        trades: outcome.trades,
        logs: outcome.logs,
        summary,
    }
}
