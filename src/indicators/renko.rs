//! Renko brick builder
//!
//! Bricks are emitted whenever the source price moves `brick_size` beyond the
//! last brick close in the direction of the current run, or `reversal_size`
//! against it. A single bar can emit any number of bricks.

use tracing::{debug, warn};

use crate::models::{Brick, PriceBar, SourcePrice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Flat,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
struct Step {
    close: f64,
    dir: i8,
    reversal: bool,
}

/// Builder state carried from one bar to the next.
#[derive(Debug, Clone, Copy)]
struct Run {
    last_close: f64,
    trend: Trend,
    start_time: i64,
}

impl Run {
    fn seed(price: f64, time: i64) -> Self {
        Self {
            last_close: price,
            trend: Trend::Flat,
            start_time: time,
        }
    }

    fn emit(&mut self, step: Step, bar: &PriceBar) -> Brick {
        let open = self.last_close;
        // A brick out of a flat state or a reversal opens a new run.
        if step.reversal || self.trend == Trend::Flat {
            self.start_time = bar.time;
        }
        self.last_close = step.close;
        self.trend = if step.dir > 0 { Trend::Up } else { Trend::Down };

        Brick {
            brick_time: bar.time,
            brick_start_time: self.start_time,
            src_open: bar.open,
            src_high: bar.high,
            src_low: bar.low,
            src_close: bar.close,
            open,
            high: open.max(step.close),
            low: open.min(step.close),
            close: step.close,
            dir: step.dir,
            reversal: step.reversal,
        }
    }
}

/// Converts an ordered bar sequence into bricks.
///
/// Thresholds must be finite and positive; callers validate them beforehand
/// (`BacktestConfig::validate_strategy`).
#[derive(Debug, Clone, Copy)]
pub struct BrickBuilder {
    brick_size: f64,
    reversal_size: f64,
    source: SourcePrice,
}

impl BrickBuilder {
    /// `brick_size` and `reversal_size` must be finite and positive.
    pub fn new(brick_size: f64, reversal_size: f64) -> Self {
        debug_assert!(brick_size.is_finite() && brick_size > 0.0);
        debug_assert!(reversal_size.is_finite() && reversal_size > 0.0);
        Self {
            brick_size,
            reversal_size,
            source: SourcePrice::Close,
        }
    }

    /// Select which bar price feeds the builder (close by default).
    pub fn with_source(mut self, source: SourcePrice) -> Self {
        self.source = source;
        self
    }

    pub fn build(&self, bars: &[PriceBar]) -> Vec<Brick> {
        let mut bricks = Vec::new();
        let mut run: Option<Run> = None;

        for bar in bars {
            let price = self.source.price(bar);
            if !price.is_finite() {
                warn!(time = bar.time, source = %self.source, "skipping bar with non-finite source price");
                continue;
            }

            let Some(state) = run.as_mut() else {
                run = Some(Run::seed(price, bar.time));
                continue;
            };

            let limit = self.step_limit(state.last_close, price);
            let mut emitted = 0usize;
            while let Some(step) = self.next_step(state, price) {
                // A threshold below the float spacing at this price level
                // leaves the close where it was.
                if step.close == state.last_close {
                    warn!(
                        time = bar.time,
                        price,
                        brick_size = self.brick_size,
                        "brick step lost to float precision, skipping bar"
                    );
                    break;
                }
                bricks.push(state.emit(step, bar));
                emitted += 1;
                if emitted >= limit {
                    warn!(time = bar.time, price, emitted, "brick cascade hit its per-bar limit");
                    break;
                }
            }
        }

        debug!(bars = bars.len(), bricks = bricks.len(), "renko bricks built");
        bricks
    }

    /// Upper bound on bricks one bar can emit: every step covers at least
    /// min(brick_size, reversal_size) of the distance to `price`.
    fn step_limit(&self, last_close: f64, price: f64) -> usize {
        let min_step = self.brick_size.min(self.reversal_size);
        ((price - last_close).abs() / min_step) as usize + 2
    }

    fn next_step(&self, run: &Run, price: f64) -> Option<Step> {
        let last = run.last_close;
        match run.trend {
            Trend::Flat => {
                let diff = price - last;
                if diff.abs() < self.brick_size {
                    return None;
                }
                let dir: i8 = if diff > 0.0 { 1 } else { -1 };
                Some(Step {
                    close: last + f64::from(dir) * self.brick_size,
                    dir,
                    reversal: false,
                })
            }
            Trend::Up => {
                if price >= last + self.brick_size {
                    Some(Step {
                        close: last + self.brick_size,
                        dir: 1,
                        reversal: false,
                    })
                } else if price <= last - self.reversal_size {
                    Some(Step {
                        close: last - self.reversal_size,
                        dir: -1,
                        reversal: true,
                    })
                } else {
                    None
                }
            }
            Trend::Down => {
                if price <= last - self.brick_size {
                    Some(Step {
                        close: last - self.brick_size,
                        dir: -1,
                        reversal: false,
                    })
                } else if price >= last + self.reversal_size {
                    Some(Step {
                        close: last + self.reversal_size,
                        dir: 1,
                        reversal: true,
                    })
                } else {
                    None
                }
            }
        }
    }
}

/// Build bricks from bar closes. Both thresholds must be finite and positive.
pub fn build_bricks(bars: &[PriceBar], brick_size: f64, reversal_size: f64) -> Vec<Brick> {
    BrickBuilder::new(brick_size, reversal_size).build(bars)
}
