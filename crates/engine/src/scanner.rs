use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::{stream, StreamExt};
use tracing::{error, info, warn};

use common::{
    notify_best_effort, Config, Error, MarketDataProvider, Notifier, Result, ScanSummary,
    ScoreRecord, SignalLabel,
};
use strategy::IndicatorSet;

use crate::signal_log::SignalLog;

/// One full pass over the symbol universe.
#[async_trait]
pub trait ScanCycle: Send + Sync {
    async fn run_cycle(&self) -> ScanSummary;
}

/// Knobs for a scan cycle.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub interval: String,
    pub limit: usize,
    /// Maximum number of symbols analyzed at once.
    pub concurrency: usize,
    /// Upper bound on a single candle fetch.
    pub request_timeout: Duration,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            interval: common::provider::DEFAULT_INTERVAL.to_string(),
            limit: common::provider::DEFAULT_LIMIT,
            concurrency: 8,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl ScanSettings {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            interval: cfg.kline_interval.clone(),
            limit: cfg.kline_limit,
            concurrency: cfg.scan_concurrency.max(1),
            request_timeout: cfg.request_timeout,
        }
    }
}

/// Fetches, scores, records and alerts for every tradable USDT pair.
///
/// Symbols are analyzed in independent tasks with bounded concurrency.
/// Results are consumed in symbol order by a single loop, which is the only
/// writer of the signal log and the only caller of the notifier.
pub struct Scanner {
    provider: Arc<dyn MarketDataProvider>,
    notifier: Arc<dyn Notifier>,
    log: SignalLog,
    settings: ScanSettings,
    indicators: IndicatorSet,
}

impl Scanner {
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        notifier: Arc<dyn Notifier>,
        log: SignalLog,
        settings: ScanSettings,
    ) -> Self {
        Self {
            provider,
            notifier,
            log,
            settings,
            indicators: IndicatorSet::default(),
        }
    }

    async fn scan(&self) -> ScanSummary {
        let started_at = Utc::now();
        info!("New scan started: {}", started_at.format("%Y-%m-%d %H:%M:%S"));
        let mut summary = ScanSummary::new(started_at);

        let symbols = match self.provider.list_tradable_usdt_symbols().await {
            Ok(symbols) => symbols,
            Err(e) => {
                warn!(error = %e, "Could not fetch USDT pairs, nothing to scan this cycle");
                Vec::new()
            }
        };
        summary.symbols = symbols.len();

        let mut results = stream::iter(symbols)
            .map(|symbol| {
                let task = tokio::spawn(analyze_symbol(
                    self.provider.clone(),
                    symbol.clone(),
                    self.settings.clone(),
                    self.indicators.clone(),
                ));
                async move { (symbol, task.await) }
            })
            .buffered(self.settings.concurrency.max(1));

        while let Some((symbol, outcome)) = results.next().await {
            match outcome {
                Ok(Ok(record)) => self.handle_record(record, &mut summary).await,
                Ok(Err(e)) => {
                    summary.skipped += 1;
                    warn!(symbol = %symbol, error = %e, "Skipping symbol");
                }
                Err(e) => {
                    summary.skipped += 1;
                    error!(symbol = %symbol, error = %e, "Analysis task failed");
                }
            }
        }

        summary.finished_at = Utc::now();
        let elapsed_ms = (summary.finished_at - summary.started_at).num_milliseconds();
        info!(
            symbols = summary.symbols,
            analyzed = summary.analyzed,
            skipped = summary.skipped,
            strong = summary.strong,
            good = summary.good,
            weak = summary.weak,
            elapsed_ms,
            "Scan completed: {}",
            summary.finished_at.format("%Y-%m-%d %H:%M:%S")
        );
        summary
    }

    async fn handle_record(&self, record: ScoreRecord, summary: &mut ScanSummary) {
        let ind = &record.indicators;
        info!(
            symbol = %record.symbol,
            score = record.score,
            label = %record.label,
            rsi = ind.rsi,
            macd = ind.macd_diff,
            price = ind.last_price,
            "{}",
            record.label.description()
        );

        if let Err(e) = self.log.append(&record).await {
            error!(symbol = %record.symbol, path = %self.log.path().display(), error = %e, "Failed to write signal log");
        }

        if record.label == SignalLabel::Strong {
            notify_best_effort(self.notifier.as_ref(), &record.alert_message()).await;
        }

        summary.record(record.label);
    }
}

#[async_trait]
impl ScanCycle for Scanner {
    async fn run_cycle(&self) -> ScanSummary {
        self.scan().await
    }
}

async fn analyze_symbol(
    provider: Arc<dyn MarketDataProvider>,
    symbol: String,
    settings: ScanSettings,
    indicators: IndicatorSet,
) -> Result<ScoreRecord> {
    let fetch = provider.get_recent_candles(&symbol, &settings.interval, settings.limit);
    let candles = tokio::time::timeout(settings.request_timeout, fetch)
        .await
        .map_err(|_| {
            Error::ProviderUnavailable(format!(
                "candle request timed out after {:?}",
                settings.request_timeout
            ))
        })??;

    strategy::analyze(&symbol, &candles, &indicators)
}
