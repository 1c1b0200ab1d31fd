//! Trade ledger and decision log records produced by the signal engine.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Profit of a unit position opened at `entry` and closed at `exit`.
    pub fn profit(self, entry: f64, exit: f64) -> f64 {
        match self {
            Direction::Long => exit - entry,
            Direction::Short => entry - exit,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Long => "long",
            Direction::Short => "short",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub entry_time: i64,
    pub entry_price: f64,
    pub exit_time: i64,
    pub exit_price: f64,
    pub direction: Direction,
    pub profit: f64,
}

/// Position held after a log entry was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    None,
    Long,
    Short,
}

impl PositionSide {
    pub fn as_str(self) -> &'static str {
        match self {
            PositionSide::None => "none",
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }
}

impl From<Direction> for PositionSide {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Long => PositionSide::Long,
            Direction::Short => PositionSide::Short,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Skip,
    NoTrade,
    EnterLong,
    EnterShort,
    HoldLong,
    HoldShort,
    ExitLong,
    ExitShort,
    ForceExitLong,
    ForceExitShort,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Skip => "skip",
            Action::NoTrade => "no_trade",
            Action::EnterLong => "enter_long",
            Action::EnterShort => "enter_short",
            Action::HoldLong => "hold_long",
            Action::HoldShort => "hold_short",
            Action::ExitLong => "exit_long",
            Action::ExitShort => "exit_short",
            Action::ForceExitLong => "force_exit_long",
            Action::ForceExitShort => "force_exit_short",
        }
    }

    pub fn is_entry(self) -> bool {
        matches!(self, Action::EnterLong | Action::EnterShort)
    }

    /// Signal exits and end-of-sequence closes alike.
    pub fn is_exit(self) -> bool {
        matches!(
            self,
            Action::ExitLong | Action::ExitShort | Action::ForceExitLong | Action::ForceExitShort
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decision per processed brick, plus one for a forced close.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub time: i64,
    pub action: Action,
    pub reason: String,
    pub close: f64,
    pub kijun: f64,
    pub cloud_top: f64,
    pub cloud_bottom: f64,
    pub long_entry_signal: bool,
    pub long_exit_signal: bool,
    pub short_entry_signal: bool,
    pub short_exit_signal: bool,
    pub position: PositionSide,
    pub available_bricks: usize,
}
