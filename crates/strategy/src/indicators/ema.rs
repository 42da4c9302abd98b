use common::{Error, Result};

/// EMA (Exponential Moving Average) indicator.
///
/// Same recursion as pandas `ewm(span=window, adjust=False)`: seeded with the
/// first close, then `α·price + (1−α)·prev` with `α = 2/(window+1)`.
/// Undefined until `window` closes are available.
#[derive(Debug, Clone)]
pub struct EmaIndicator {
    pub window: usize,
}

impl EmaIndicator {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "EMA window must be >= 1");
        Self { window }
    }

    /// Last EMA value over `closes` (oldest first).
    pub fn compute(&self, closes: &[f64]) -> Result<f64> {
        if closes.len() < self.window {
            return Err(Error::InsufficientHistory {
                indicator: "EMA",
                required: self.window,
                available: closes.len(),
            });
        }
        Ok(ewm_last(closes, span_alpha(self.window)))
    }
}

/// Smoothing factor for a span-based EMA.
pub(crate) fn span_alpha(window: usize) -> f64 {
    2.0 / (window as f64 + 1.0)
}

/// Full exponentially weighted series (adjust=False), seeded with `values[0]`.
pub(crate) fn ewm(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let next = match prev {
            None => v,
            Some(p) => alpha * v + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

pub(crate) fn ewm_last(values: &[f64], alpha: f64) -> f64 {
    ewm(values, alpha).last().copied().unwrap_or(0.0)
}
