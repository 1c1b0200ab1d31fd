//! Per-brick cloud predicates and the reason text attached to each decision.

use crate::indicators::IchimokuParams;
use crate::models::Action;

pub const REASON_ENTER_LONG: &str = "Renko close > kijun and > cloud_top";
pub const REASON_ENTER_SHORT: &str = "Renko close < kijun and < cloud_bottom";
pub const REASON_EXIT_LONG: &str = "Renko closed below kijun or below cloud_top";
pub const REASON_EXIT_SHORT: &str = "Renko closed above kijun or above cloud_bottom";
pub const REASON_HOLD: &str = "Exit conditions not met";
pub const REASON_FORCED_CLOSE: &str = "closed at end of backtest";

pub const NO_ENTRY_INSIDE_CLOUD: &str = "No entry: price inside cloud";
pub const NO_ENTRY_LONG_LEVELS: &str =
    "No entry: price not above all required Ichimoku levels for long";
pub const NO_ENTRY_SHORT_LEVELS: &str =
    "No entry: price not below all required Ichimoku levels for short";
pub const NO_ENTRY_GENERIC: &str = "No entry: conditions not met";

/// Entry/exit predicates for one brick with a fully defined cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CloudSignals {
    pub inside_cloud: bool,
    pub long_entry: bool,
    pub long_exit: bool,
    pub short_entry: bool,
    pub short_exit: bool,
    long_levels_missed: bool,
    short_levels_missed: bool,
}

impl CloudSignals {
    pub fn evaluate(close: f64, kijun: f64, cloud_top: f64, cloud_bottom: f64) -> Self {
        let inside_cloud = cloud_bottom < close && close < cloud_top;
        Self {
            inside_cloud,
            long_entry: close > kijun && close > cloud_top && !inside_cloud,
            long_exit: close < kijun || close < cloud_top,
            short_entry: close < kijun && close < cloud_bottom && !inside_cloud,
            short_exit: close > kijun || close > cloud_bottom,
            long_levels_missed: close <= kijun || close <= cloud_top,
            short_levels_missed: close >= kijun || close >= cloud_bottom,
        }
    }

    /// The flags a log row records for `action`: only the predicate that
    /// drove it. A `no_trade` row keeps both entry predicates; holds, skips
    /// and forced closes record none.
    pub fn recorded_for(&self, action: Action) -> Self {
        let (long_entry, long_exit, short_entry, short_exit) = match action {
            Action::EnterLong => (true, false, false, false),
            Action::EnterShort => (false, false, true, false),
            Action::NoTrade => (self.long_entry, false, self.short_entry, false),
            Action::ExitLong => (false, true, false, false),
            Action::ExitShort => (false, false, false, true),
            _ => (false, false, false, false),
        };
        Self {
            long_entry,
            long_exit,
            short_entry,
            short_exit,
            ..*self
        }
    }

    /// Why a flat book stayed flat, most specific cause first.
    pub fn no_entry_reason(&self) -> &'static str {
        if self.inside_cloud {
            NO_ENTRY_INSIDE_CLOUD
        } else if self.long_levels_missed {
            NO_ENTRY_LONG_LEVELS
        } else if self.short_levels_missed {
            NO_ENTRY_SHORT_LEVELS
        } else {
            NO_ENTRY_GENERIC
        }
    }
}

/// Reason for a skipped brick, naming each line that lacks history.
pub fn insufficient_history_reason(
    kijun_missing: bool,
    cloud_missing: bool,
    params: &IchimokuParams,
    available: usize,
) -> String {
    let mut parts = Vec::with_capacity(2);
    if kijun_missing {
        parts.push(format!("kijun: need {}, have {}", params.kijun, available));
    }
    if cloud_missing {
        parts.push(format!(
            "span_b (or span_a): need {}, have {}",
            params.span_b, available
        ));
    }
    format!("Not enough history for Ichimoku -> {}", parts.join("; "))
}
