use serde::{Deserialize, Serialize};

/// A fixed-size renko brick.
///
/// `src_*` carry the raw prices of the bar that triggered the brick and are
/// kept for provenance only. `open`/`high`/`low`/`close` are the brick's own
/// prices: every brick spans exactly `brick_size` (or `reversal_size` when
/// `reversal` is set) between `open` and `close`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub brick_time: i64,
    pub brick_start_time: i64,
    pub src_open: f64,
    pub src_high: f64,
    pub src_low: f64,
    pub src_close: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub dir: i8,
    pub reversal: bool,
}

impl Brick {
    pub fn is_up(&self) -> bool {
        self.dir > 0
    }

    pub fn is_down(&self) -> bool {
        self.dir < 0
    }
}
