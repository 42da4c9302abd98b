use common::{Error, Result};

/// Bollinger Bands over the most recent `window` closes:
/// SMA ± `num_std` population standard deviations (ddof = 0).
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub window: usize,
    pub num_std: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandsOutput {
    pub lower: f64,
    pub middle: f64,
    pub upper: f64,
}

impl BollingerBands {
    pub fn new(window: usize, num_std: f64) -> Self {
        assert!(window >= 1, "Bollinger window must be >= 1");
        Self { window, num_std }
    }

    pub fn compute(&self, closes: &[f64]) -> Result<BandsOutput> {
        if closes.len() < self.window {
            return Err(Error::InsufficientHistory {
                indicator: "Bollinger Bands",
                required: self.window,
                available: closes.len(),
            });
        }

        let recent = &closes[closes.len() - self.window..];
        let n = self.window as f64;
        let middle = recent.iter().sum::<f64>() / n;
        let variance = recent.iter().map(|v| (v - middle).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        Ok(BandsOutput {
            lower: middle - self.num_std * std,
            middle,
            upper: middle + self.num_std * std,
        })
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new(20, 2.0)
    }
}
