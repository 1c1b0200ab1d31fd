//! Ichimoku cloud over brick closes
//!
//! Tenkan, Kijun and Senkou B are Donchian midpoints of the close series:
//! (highest + lowest) / 2 over a trailing window.
//! Senkou A = (Tenkan + Kijun) / 2 where both are defined.
//! Chikou = close shifted back by `displacement`.
//!
//! Lines are not displaced forward; index i of every line belongs to brick i.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::models::{Brick, IchimokuLines};

/// Window lengths of the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IchimokuParams {
    pub tenkan: usize,
    pub kijun: usize,
    pub span_b: usize,
    pub displacement: usize,
}

impl Default for IchimokuParams {
    fn default() -> Self {
        Self {
            tenkan: 5,
            kijun: 26,
            span_b: 52,
            displacement: 26,
        }
    }
}

/// Donchian midpoint over a trailing window of `length` values.
///
/// Indices without a full window are NaN. A zero length, or one longer than
/// the series, yields an all-NaN line.
pub fn rolling_midpoint(series: &[f64], length: usize) -> Vec<f64> {
    let n = series.len();
    let mut out = vec![f64::NAN; n];
    if length == 0 || length > n {
        return out;
    }

    // Monotonic deques of indices: front is the window max / min.
    let mut highs: VecDeque<usize> = VecDeque::with_capacity(length);
    let mut lows: VecDeque<usize> = VecDeque::with_capacity(length);

    for (i, &value) in series.iter().enumerate() {
        while highs.back().is_some_and(|&j| series[j] <= value) {
            highs.pop_back();
        }
        highs.push_back(i);
        while lows.back().is_some_and(|&j| series[j] >= value) {
            lows.pop_back();
        }
        lows.push_back(i);

        if i + 1 < length {
            continue;
        }
        let window_start = i + 1 - length;
        while highs.front().is_some_and(|&j| j < window_start) {
            highs.pop_front();
        }
        while lows.front().is_some_and(|&j| j < window_start) {
            lows.pop_front();
        }

        if let (Some(&hi), Some(&lo)) = (highs.front(), lows.front()) {
            out[i] = (series[hi] + series[lo]) / 2.0;
        }
    }

    out
}

/// Average of two lines, NaN wherever either input is NaN.
pub fn midline(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            if x.is_nan() || y.is_nan() {
                f64::NAN
            } else {
                (x + y) / 2.0
            }
        })
        .collect()
}

/// Close shifted back by `displacement` bricks.
pub fn lagging_line(series: &[f64], displacement: usize) -> Vec<f64> {
    (0..series.len())
        .map(|i| {
            if i >= displacement {
                series[i - displacement]
            } else {
                f64::NAN
            }
        })
        .collect()
}

pub fn calculate_ichimoku(closes: &[f64], params: &IchimokuParams) -> IchimokuLines {
    let tenkan = rolling_midpoint(closes, params.tenkan);
    let kijun = rolling_midpoint(closes, params.kijun);
    let span_b = rolling_midpoint(closes, params.span_b);
    let span_a = midline(&tenkan, &kijun);
    let chikou = lagging_line(closes, params.displacement);

    IchimokuLines {
        tenkan,
        kijun,
        span_a,
        span_b,
        chikou,
    }
}

/// Ichimoku lines over the close of each brick.
pub fn ichimoku_on_bricks(bricks: &[Brick], params: &IchimokuParams) -> IchimokuLines {
    let closes: Vec<f64> = bricks.iter().map(|b| b.close).collect();
    calculate_ichimoku(&closes, params)
}
