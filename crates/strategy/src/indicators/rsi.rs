use common::{Error, Result};

use super::ema::ewm_last;

/// RSI (Relative Strength Index) indicator.
///
/// Gains and losses are smoothed with Wilder's factor `1/period` as an
/// exponential recursion seeded at the first bar, where the change is taken
/// as zero. Undefined until `period` closes are available.
#[derive(Debug, Clone)]
pub struct RsiIndicator {
    pub period: usize,
}

impl RsiIndicator {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "RSI period must be >= 2");
        Self { period }
    }

    /// Compute the latest RSI from a slice of close prices (oldest first).
    pub fn compute(&self, closes: &[f64]) -> Result<f64> {
        if closes.len() < self.period {
            return Err(Error::InsufficientHistory {
                indicator: "RSI",
                required: self.period,
                available: closes.len(),
            });
        }

        let changes: Vec<f64> = std::iter::once(0.0)
            .chain(closes.windows(2).map(|w| w[1] - w[0]))
            .collect();
        let gains: Vec<f64> = changes.iter().map(|&c| c.max(0.0)).collect();
        let losses: Vec<f64> = changes.iter().map(|&c| (-c).max(0.0)).collect();

        let alpha = 1.0 / self.period as f64;
        let avg_gain = ewm_last(&gains, alpha);
        let avg_loss = ewm_last(&losses, alpha);

        if avg_loss == 0.0 {
            return Ok(100.0);
        }

        let rs = avg_gain / avg_loss;
        Ok(100.0 - 100.0 / (1.0 + rs))
    }
}

impl Default for RsiIndicator {
    fn default() -> Self {
        Self::new(14)
    }
}
