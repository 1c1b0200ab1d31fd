use serde::Serialize;

/// Ichimoku lines aligned index-for-index with the brick series.
///
/// Undefined entries are `f64::NAN`, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IchimokuLines {
    pub tenkan: Vec<f64>,
    pub kijun: Vec<f64>,
    pub span_a: Vec<f64>,
    pub span_b: Vec<f64>,
    pub chikou: Vec<f64>,
}

impl IchimokuLines {
    pub fn len(&self) -> usize {
        self.kijun.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kijun.is_empty()
    }

    /// Upper and lower cloud edge at `i`, NaN while either span is undefined.
    pub fn cloud(&self, i: usize) -> (f64, f64) {
        let a = self.span_a.get(i).copied().unwrap_or(f64::NAN);
        let b = self.span_b.get(i).copied().unwrap_or(f64::NAN);
        if a.is_nan() || b.is_nan() {
            return (f64::NAN, f64::NAN);
        }
        (a.max(b), a.min(b))
    }
}
