use common::{IndicatorSnapshot, ScoreRecord, SignalLabel};

pub const RSI_OVERSOLD: f64 = 30.0;
/// Looser RSI bound used only by the weak-candidate fallback.
pub const RSI_WEAK: f64 = 40.0;
pub const MAX_SCORE: u8 = 4;

/// The four independent buy conditions, in scoring order.
pub fn conditions(snapshot: &IndicatorSnapshot) -> [bool; 4] {
    [
        snapshot.rsi < RSI_OVERSOLD,
        snapshot.macd_diff > 0.0,
        snapshot.last_price < snapshot.bb_lower,
        snapshot.ema_short > snapshot.ema_long,
    ]
}

/// Number of satisfied conditions, 0..=4.
pub fn score(snapshot: &IndicatorSnapshot) -> u8 {
    conditions(snapshot).iter().filter(|&&c| c).count() as u8
}

/// First match wins: 4 → Strong, 3 → Good, then the RSI/MACD weak check.
pub fn label(score: u8, snapshot: &IndicatorSnapshot) -> SignalLabel {
    if score == MAX_SCORE {
        SignalLabel::Strong
    } else if score == 3 {
        SignalLabel::Good
    } else if snapshot.rsi < RSI_WEAK && snapshot.macd_diff > 0.0 {
        SignalLabel::Weak
    } else {
        SignalLabel::NoSignal
    }
}

pub fn evaluate(symbol: impl Into<String>, snapshot: IndicatorSnapshot) -> ScoreRecord {
    let score = score(&snapshot);
    ScoreRecord {
        symbol: symbol.into(),
        label: label(score, &snapshot),
        indicators: snapshot,
        score,
    }
}
