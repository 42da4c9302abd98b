use chrono::{DateTime, Utc};

/// One kline from the exchange. Series are ordered oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Volume denominated in the quote asset (USDT).
    pub quote_volume: f64,
    pub trades: u64,
}

/// Last computed value of every indicator over one candle series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub rsi: f64,
    /// MACD histogram: MACD line minus its signal line.
    pub macd_diff: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    pub bb_lower: f64,
    pub bb_upper: f64,
    pub last_price: f64,
}

/// Categorical outcome of scoring one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalLabel {
    Strong,
    Good,
    Weak,
    NoSignal,
}

impl SignalLabel {
    pub fn description(&self) -> &'static str {
        match self {
            SignalLabel::Strong => "strong buy signal",
            SignalLabel::Good => "good buy candidate",
            SignalLabel::Weak => "weak buy candidate",
            SignalLabel::NoSignal => "no signal",
        }
    }
}

impl std::fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalLabel::Strong => write!(f, "STRONG"),
            SignalLabel::Good => write!(f, "GOOD"),
            SignalLabel::Weak => write!(f, "WEAK"),
            SignalLabel::NoSignal => write!(f, "NONE"),
        }
    }
}

/// Result of analyzing one symbol in one scan cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub symbol: String,
    pub indicators: IndicatorSnapshot,
    /// Number of satisfied buy conditions, 0..=4.
    pub score: u8,
    pub label: SignalLabel,
}

impl ScoreRecord {
    /// Multi-line block appended to the signal log.
    pub fn log_block(&self) -> String {
        let ind = &self.indicators;
        let mut block = format!(
            "\n{} | RSI: {:.2} | MACD: {:.5} | EMA9: {:.2} | EMA21: {:.2} | Price: {:.2} | BB: [{:.2} - {:.2}] | Score: {}/4\n",
            self.symbol,
            ind.rsi,
            ind.macd_diff,
            ind.ema_short,
            ind.ema_long,
            ind.last_price,
            ind.bb_lower,
            ind.bb_upper,
            self.score,
        );
        match self.label {
            SignalLabel::NoSignal => block.push_str("No signal\n"),
            label => block.push_str(&format!(
                ">>> {} {}\n",
                self.symbol,
                label.description().to_uppercase()
            )),
        }
        block
    }

    /// Alert text sent to the notifier for strong signals.
    pub fn alert_message(&self) -> String {
        let ind = &self.indicators;
        format!(
            "🚨 {} STRONG BUY SIGNAL!\nPrice: {:.2}\nRSI: {:.2} | MACD: {:.5}",
            self.symbol, ind.last_price, ind.rsi, ind.macd_diff
        )
    }
}

/// Observable state of the scan scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Idle,
    Running,
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanState::Idle => write!(f, "idle"),
            ScanState::Running => write!(f, "running"),
        }
    }
}

/// Counters for one completed scan cycle.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub symbols: usize,
    pub analyzed: usize,
    pub skipped: usize,
    pub strong: usize,
    pub good: usize,
    pub weak: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScanSummary {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            symbols: 0,
            analyzed: 0,
            skipped: 0,
            strong: 0,
            good: 0,
            weak: 0,
            started_at,
            finished_at: started_at,
        }
    }

    pub fn record(&mut self, label: SignalLabel) {
        self.analyzed += 1;
        match label {
            SignalLabel::Strong => self.strong += 1,
            SignalLabel::Good => self.good += 1,
            SignalLabel::Weak => self.weak += 1,
            SignalLabel::NoSignal => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(label: SignalLabel, score: u8) -> ScoreRecord {
        ScoreRecord {
            symbol: "BTCUSDT".into(),
            indicators: IndicatorSnapshot {
                rsi: 25.123,
                macd_diff: 0.0021,
                ema_short: 101.5,
                ema_long: 100.25,
                bb_lower: 99.0,
                bb_upper: 110.0,
                last_price: 98.7712,
            },
            score,
            label,
        }
    }

    #[test]
    fn log_block_contains_values_and_label_line() {
        let block = record(SignalLabel::Strong, 4).log_block();
        assert_eq!(
            block,
            "\nBTCUSDT | RSI: 25.12 | MACD: 0.00210 | EMA9: 101.50 | EMA21: 100.25 | \
             Price: 98.77 | BB: [99.00 - 110.00] | Score: 4/4\n>>> BTCUSDT STRONG BUY SIGNAL\n"
        );
    }

    #[test]
    fn log_block_for_no_signal() {
        let block = record(SignalLabel::NoSignal, 1).log_block();
        assert!(block.ends_with("Score: 1/4\nNo signal\n"), "{block}");
    }

    #[test]
    fn alert_message_has_symbol_and_price() {
        let msg = record(SignalLabel::Strong, 4).alert_message();
        assert!(msg.contains("BTCUSDT"));
        assert!(msg.contains("Price: 98.77"));
    }

    #[test]
    fn summary_counts_labels() {
        let mut summary = ScanSummary::new(Utc::now());
        for label in [SignalLabel::Strong, SignalLabel::Weak, SignalLabel::NoSignal] {
            summary.record(label);
        }
        assert_eq!(summary.analyzed, 3);
        assert_eq!(summary.strong, 1);
        assert_eq!(summary.weak, 1);
        assert_eq!(summary.good, 0);
    }
}
