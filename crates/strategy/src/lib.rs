pub mod indicators;
pub mod scorer;

pub use indicators::IndicatorSet;
pub use scorer::{evaluate, label, score};

use common::{Candle, Error, Result, ScoreRecord};

/// Compute indicators over a candle series and score the result.
///
/// An empty or too-short series yields `Error::InsufficientHistory` so the
/// caller can skip the symbol.
pub fn analyze(symbol: &str, candles: &[Candle], indicators: &IndicatorSet) -> Result<ScoreRecord> {
    if candles.is_empty() {
        return Err(Error::InsufficientHistory {
            indicator: "candles",
            required: 1,
            available: 0,
        });
    }
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let snapshot = indicators.compute(&closes)?;
    Ok(evaluate(symbol, snapshot))
}
