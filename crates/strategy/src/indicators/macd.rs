use common::{Error, Result};

use super::ema::{ewm, span_alpha};

/// MACD (Moving Average Convergence/Divergence) indicator.
///
/// MACD line = EMA(fast) − EMA(slow), both seeded at the first close.
/// The line is defined from the `slow`-th close onward; the signal line is an
/// EMA(signal) of the defined part. The histogram is line − signal.
#[derive(Debug, Clone)]
pub struct MacdIndicator {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

/// Last values of the MACD computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdIndicator {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(
            fast < slow,
            "MACD fast period must be less than slow period"
        );
        assert!(signal >= 1, "MACD signal period must be >= 1");
        Self { fast, slow, signal }
    }

    /// Minimum number of closes before the histogram is defined.
    pub fn min_len(&self) -> usize {
        self.slow + self.signal - 1
    }

    /// Compute the latest MACD values from close prices (oldest first).
    pub fn compute(&self, closes: &[f64]) -> Result<MacdOutput> {
        if closes.len() < self.min_len() {
            return Err(Error::InsufficientHistory {
                indicator: "MACD",
                required: self.min_len(),
                available: closes.len(),
            });
        }

        let fast = ewm(closes, span_alpha(self.fast));
        let slow = ewm(closes, span_alpha(self.slow));

        let macd_line: Vec<f64> = fast
            .iter()
            .zip(&slow)
            .skip(self.slow - 1)
            .map(|(f, s)| f - s)
            .collect();
        let signal_line = ewm(&macd_line, span_alpha(self.signal));

        let (macd, signal) = match (macd_line.last(), signal_line.last()) {
            (Some(&m), Some(&s)) => (m, s),
            _ => {
                return Err(Error::InsufficientHistory {
                    indicator: "MACD",
                    required: self.min_len(),
                    available: closes.len(),
                })
            }
        };

        Ok(MacdOutput {
            macd,
            signal,
            histogram: macd - signal,
        })
    }
}

impl Default for MacdIndicator {
    fn default() -> Self {
        Self::new(12, 26, 9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trending_up(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    fn trending_down(n: usize) -> Vec<f64> {
        (0..n).map(|i| 200.0 - i as f64 * 0.5).collect()
    }

    #[test]
    fn default_minimum_matches_provider_floor() {
        assert_eq!(MacdIndicator::default().min_len(), common::provider::MIN_CANDLES);
    }

    #[test]
    fn macd_errors_with_insufficient_data() {
        let macd = MacdIndicator::default();
        let prices = vec![100.0; 33]; // need >= 34
        assert!(matches!(
            macd.compute(&prices),
            Err(Error::InsufficientHistory { required: 34, available: 33, .. })
        ));
    }

    #[test]
    fn macd_defined_at_minimum_length() {
        let macd = MacdIndicator::default();
        assert!(macd.compute(&trending_up(34)).is_ok());
    }

    #[test]
    fn macd_flat_series_has_zero_histogram() {
        let out = MacdIndicator::default().compute(&[50.0; 60]).unwrap();
        assert!(out.macd.abs() < 1e-12);
        assert!(out.histogram.abs() < 1e-12);
    }

    #[test]
    fn macd_line_sign_follows_trend() {
        let macd = MacdIndicator::default();
        assert!(macd.compute(&trending_up(100)).unwrap().macd > 0.0);
        assert!(macd.compute(&trending_down(100)).unwrap().macd < 0.0);
    }

    #[test]
    fn macd_histogram_positive_after_reversal_up() {
        let macd = MacdIndicator::new(3, 6, 3);
        // Down then sharply up: MACD line accelerates above its signal line
        let mut prices: Vec<f64> = (0..20).map(|i| 100.0 - i as f64 * 0.5).collect();
        prices.extend((0..10).map(|i| 90.0 + i as f64 * 2.0));
        let out = macd.compute(&prices).unwrap();
        assert!(out.histogram > 0.0, "histogram {}", out.histogram);
    }

    #[test]
    fn histogram_is_line_minus_signal() {
        let out = MacdIndicator::default().compute(&trending_up(80)).unwrap();
        assert!((out.histogram - (out.macd - out.signal)).abs() < 1e-12);
    }
}
