pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use bollinger::{BandsOutput, BollingerBands};
pub use ema::EmaIndicator;
pub use macd::{MacdIndicator, MacdOutput};
pub use rsi::RsiIndicator;

use common::{Error, IndicatorSnapshot, Result};

/// The fixed indicator bundle evaluated for every symbol.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub rsi: RsiIndicator,
    pub macd: MacdIndicator,
    pub ema_short: EmaIndicator,
    pub ema_long: EmaIndicator,
    pub bollinger: BollingerBands,
}

impl Default for IndicatorSet {
    fn default() -> Self {
        Self {
            rsi: RsiIndicator::new(14),
            macd: MacdIndicator::new(12, 26, 9),
            ema_short: EmaIndicator::new(9),
            ema_long: EmaIndicator::new(21),
            bollinger: BollingerBands::new(20, 2.0),
        }
    }
}

impl IndicatorSet {
    /// Compute every indicator over `closes` (oldest first).
    /// Fails with the first `InsufficientHistory` encountered.
    pub fn compute(&self, closes: &[f64]) -> Result<IndicatorSnapshot> {
        let ema_long = self.ema_long.compute(closes)?;
        let ema_short = self.ema_short.compute(closes)?;
        let bands = self.bollinger.compute(closes)?;
        let rsi = self.rsi.compute(closes)?;
        let macd = self.macd.compute(closes)?;

        let last_price = *closes.last().ok_or(Error::InsufficientHistory {
            indicator: "price",
            required: 1,
            available: 0,
        })?;

        Ok(IndicatorSnapshot {
            rsi,
            macd_diff: macd.histogram,
            ema_short,
            ema_long,
            bb_lower: bands.lower,
            bb_upper: bands.upper,
            last_price,
        })
    }
}
