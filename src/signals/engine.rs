//! Long/flat/short state machine over bricks and their Ichimoku cloud.

use tracing::{debug, trace};

use crate::indicators::IchimokuParams;
use crate::models::{
    Action, Brick, Direction, IchimokuLines, LogEntry, PositionSide, Trade,
};
use crate::signals::decision::{
    insufficient_history_reason, CloudSignals, REASON_ENTER_LONG, REASON_ENTER_SHORT,
    REASON_EXIT_LONG, REASON_EXIT_SHORT, REASON_FORCED_CLOSE, REASON_HOLD,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub time: i64,
    pub price: f64,
}

/// The single position slot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    #[default]
    Flat,
    Long(Entry),
    Short(Entry),
}

impl Position {
    pub fn side(&self) -> PositionSide {
        match self {
            Position::Flat => PositionSide::None,
            Position::Long(_) => PositionSide::Long,
            Position::Short(_) => PositionSide::Short,
        }
    }

    fn open(&self) -> Option<(Direction, Entry)> {
        match *self {
            Position::Flat => None,
            Position::Long(entry) => Some((Direction::Long, entry)),
            Position::Short(entry) => Some((Direction::Short, entry)),
        }
    }

    /// Close an open position at `(time, price)`, leaving the slot flat.
    fn close(&mut self, time: i64, price: f64) -> Option<Trade> {
        let (direction, entry) = self.open()?;
        *self = Position::Flat;
        Some(Trade {
            entry_time: entry.time,
            entry_price: entry.price,
            exit_time: time,
            exit_price: price,
            direction,
            profit: direction.profit(entry.price, price),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignalOutcome {
    pub trades: Vec<Trade>,
    pub logs: Vec<LogEntry>,
}

/// Cloud values at one brick.
#[derive(Debug, Clone, Copy)]
struct Levels {
    kijun: f64,
    cloud_top: f64,
    cloud_bottom: f64,
}

pub struct SignalEngine {
    params: IchimokuParams,
}

impl SignalEngine {
    /// `params` only feeds the history requirements quoted in skip reasons.
    pub fn new(params: IchimokuParams) -> Self {
        Self { params }
    }

    /// Walk the bricks in order and return the trade ledger and decision log.
    ///
    /// Every brick yields one log entry; a position still open after the last
    /// brick is closed at its close and adds one more.
    pub fn run(&self, bricks: &[Brick], lines: &IchimokuLines) -> SignalOutcome {
        let mut outcome = SignalOutcome {
            trades: Vec::new(),
            logs: Vec::with_capacity(bricks.len() + 1),
        };
        let mut position = Position::Flat;

        for (i, brick) in bricks.iter().enumerate() {
            let available = i + 1;
            let c = brick.close;
            let kijun = value_at(&lines.kijun, i);
            let span_a = value_at(&lines.span_a, i);
            let span_b = value_at(&lines.span_b, i);

            let kijun_missing = kijun.is_nan();
            let cloud_missing = span_a.is_nan() || span_b.is_nan();
            if kijun_missing || cloud_missing {
                let reason = insufficient_history_reason(
                    kijun_missing,
                    cloud_missing,
                    &self.params,
                    available,
                );
                let levels = Levels {
                    kijun,
                    cloud_top: f64::NAN,
                    cloud_bottom: f64::NAN,
                };
                outcome.logs.push(log_entry(
                    brick,
                    Action::Skip,
                    reason,
                    levels,
                    CloudSignals::default(),
                    position.side(),
                    available,
                ));
                continue;
            }

            let levels = Levels {
                kijun,
                cloud_top: span_a.max(span_b),
                cloud_bottom: span_a.min(span_b),
            };
            let signals = CloudSignals::evaluate(c, kijun, levels.cloud_top, levels.cloud_bottom);

            let (action, reason) = match position {
                Position::Flat => {
                    if signals.long_entry {
                        position = Position::Long(Entry {
                            time: brick.brick_time,
                            price: c,
                        });
                        (Action::EnterLong, REASON_ENTER_LONG)
                    } else if signals.short_entry {
                        position = Position::Short(Entry {
                            time: brick.brick_time,
                            price: c,
                        });
                        (Action::EnterShort, REASON_ENTER_SHORT)
                    } else {
                        (Action::NoTrade, signals.no_entry_reason())
                    }
                }
                Position::Long(_) if signals.long_exit => {
                    outcome.trades.extend(position.close(brick.brick_time, c));
                    (Action::ExitLong, REASON_EXIT_LONG)
                }
                Position::Long(_) => (Action::HoldLong, REASON_HOLD),
                Position::Short(_) if signals.short_exit => {
                    outcome.trades.extend(position.close(brick.brick_time, c));
                    (Action::ExitShort, REASON_EXIT_SHORT)
                }
                Position::Short(_) => (Action::HoldShort, REASON_HOLD),
            };

            if action.is_entry() || action.is_exit() {
                trace!(time = brick.brick_time, close = c, action = %action, "position change");
            }

            outcome.logs.push(log_entry(
                brick,
                action,
                reason.to_string(),
                levels,
                signals.recorded_for(action),
                position.side(),
                available,
            ));
        }

        if let Some(last) = bricks.last() {
            let side = position.side();
            if let Some(trade) = position.close(last.brick_time, last.close) {
                let i = bricks.len() - 1;
                let (cloud_top, cloud_bottom) = lines.cloud(i);
                let action = match trade.direction {
                    Direction::Long => Action::ForceExitLong,
                    Direction::Short => Action::ForceExitShort,
                };
                debug!(
                    side = side.as_str(),
                    entry_time = trade.entry_time,
                    exit_time = trade.exit_time,
                    profit = trade.profit,
                    "force-closing open position at end of bricks"
                );
                outcome.trades.push(trade);
                outcome.logs.push(log_entry(
                    last,
                    action,
                    REASON_FORCED_CLOSE.to_string(),
                    Levels {
                        kijun: value_at(&lines.kijun, i),
                        cloud_top,
                        cloud_bottom,
                    },
                    CloudSignals::default(),
                    PositionSide::None,
                    bricks.len(),
                ));
            }
        }

        debug!(
            bricks = bricks.len(),
            trades = outcome.trades.len(),
            logs = outcome.logs.len(),
            "signal engine finished"
        );
        outcome
    }
}

fn value_at(line: &[f64], i: usize) -> f64 {
    line.get(i).copied().unwrap_or(f64::NAN)
}

fn log_entry(
    brick: &Brick,
    action: Action,
    reason: String,
    levels: Levels,
    signals: CloudSignals,
    position: PositionSide,
    available_bricks: usize,
) -> LogEntry {
    LogEntry {
        time: brick.brick_time,
        action,
        reason,
        close: brick.close,
        kijun: levels.kijun,
        cloud_top: levels.cloud_top,
        cloud_bottom: levels.cloud_bottom,
        long_entry_signal: signals.long_entry,
        long_exit_signal: signals.long_exit,
        short_entry_signal: signals.short_entry,
        short_exit_signal: signals.short_exit,
        position,
        available_bricks,
    }
}
