//! Unit tests for the backtest pipeline and its summary

use brickcloud::backtest::{self, BacktestSummary};
use brickcloud::config::BacktestConfig;
use brickcloud::models::{Action, Direction, SourcePrice, Trade};

use crate::common_fixtures::{flat_bars, rise_then_fall};

fn trade(profit: f64) -> Trade {
    Trade {
        entry_time: 0,
        entry_price: 100.0,
        exit_time: 1,
        exit_price: 100.0 + profit,
        direction: Direction::Long,
        profit,
    }
}

fn small_config() -> BacktestConfig {
    BacktestConfig {
        brick_size: 1.0,
        reversal_size: 2.0,
        source_type: SourcePrice::Close,
        tenkan: 2,
        kijun: 3,
        span_b: 4,
        displacement: 2,
        ..BacktestConfig::default()
    }
}

#[test]
fn summary_of_no_trades_is_zero() {
    let summary = BacktestSummary::from_trades(0, &[]);
    assert_eq!(summary.trades, 0);
    assert_eq!(summary.total_profit, 0.0);
    assert_eq!(summary.net_profit, 0.0);
    assert_eq!(summary.winning_trades, 0);
    assert_eq!(summary.losing_trades, 0);
    assert_eq!(summary.max_drawdown, 0.0);
}

#[test]
fn summary_counts_and_drawdown() {
    let trades: Vec<Trade> = [10.0, -5.0, -10.0, 20.0].into_iter().map(trade).collect();
    let summary = BacktestSummary::from_trades(12, &trades);

    assert_eq!(summary.renko_bricks, 12);
    assert_eq!(summary.trades, 4);
    assert_eq!(summary.total_profit, 15.0);
    assert_eq!(summary.winning_trades, 2);
    assert_eq!(summary.losing_trades, 2);
    // Equity 10, 5, -5, 15: the fall from 10 to -5.
    assert_eq!(summary.max_drawdown, 15.0);
}

#[test]
fn breakeven_trades_count_as_losing() {
    let summary = BacktestSummary::from_trades(0, &[trade(0.0), trade(1.0)]);
    assert_eq!(summary.winning_trades, 1);
    assert_eq!(summary.losing_trades, 1);
}

#[test]
fn drawdown_peak_starts_at_zero() {
    let summary = BacktestSummary::from_trades(0, &[trade(-5.0), trade(2.0)]);
    assert_eq!(summary.max_drawdown, 5.0);
}

#[test]
fn net_profit_is_rounded_to_cents() {
    let summary = BacktestSummary::from_trades(0, &[trade(0.125), trade(0.001)]);
    assert_eq!(summary.net_profit, 0.13);
    assert!((summary.total_profit - 0.126).abs() < 1e-12);
}

#[test]
fn rise_and_fall_trades_both_ways() {
    let bars = flat_bars(&rise_then_fall());
    let result = backtest::run(&bars, &small_config());

    // 30 up bricks, the 128 reversal, then 127 down to 80.
    assert_eq!(result.bricks.len(), 79);
    assert_eq!(result.lines.len(), 79);

    assert_eq!(result.trades.len(), 2);
    let long = &result.trades[0];
    assert_eq!(long.direction, Direction::Long);
    assert_eq!((long.entry_price, long.exit_price), (104.0, 128.0));
    let short = &result.trades[1];
    assert_eq!(short.direction, Direction::Short);
    assert_eq!((short.entry_price, short.exit_price), (127.0, 80.0));

    assert_eq!(result.summary.renko_bricks, 79);
    assert_eq!(result.summary.trades, 2);
    assert_eq!(result.summary.total_profit, 71.0);
    assert_eq!(result.summary.net_profit, 71.0);
    assert_eq!(result.summary.max_drawdown, 0.0);

    // One entry per brick plus the forced close of the short.
    assert_eq!(result.logs.len(), 80);
    assert_eq!(result.logs[0].action, Action::Skip);
    assert_eq!(result.logs[3].action, Action::EnterLong);
    assert_eq!(result.logs[79].action, Action::ForceExitShort);
}

#[test]
fn skipped_bricks_precede_the_full_cloud() {
    let bars = flat_bars(&rise_then_fall());
    let result = backtest::run(&bars, &small_config());

    assert_eq!(
        result.logs[0].reason,
        "Not enough history for Ichimoku -> kijun: need 3, have 1; span_b (or span_a): need 4, have 1"
    );
    assert_eq!(
        result.logs[2].reason,
        "Not enough history for Ichimoku -> span_b (or span_a): need 4, have 3"
    );
}

#[test]
fn runs_are_deterministic() {
    let bars = flat_bars(&rise_then_fall());
    let config = small_config();
    let first = backtest::run(&bars, &config);
    let second = backtest::run(&bars, &config);

    assert_eq!(first.bricks, second.bricks);
    assert_eq!(first.trades, second.trades);
    assert_eq!(first.summary, second.summary);
    // Logs carry NaN levels, so compare their serialized form.
    assert_eq!(
        serde_json::to_string(&first.logs).unwrap(),
        serde_json::to_string(&second.logs).unwrap()
    );
}

#[test]
fn no_bars_no_bricks() {
    let result = backtest::run(&[], &small_config());
    assert!(result.bricks.is_empty());
    assert!(result.trades.is_empty());
    assert!(result.logs.is_empty());
    assert_eq!(result.summary.renko_bricks, 0);
}
