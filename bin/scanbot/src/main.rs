use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use common::{notify_best_effort, Config, MarketDataProvider, Notifier};
use engine::{BinanceClient, ScanSettings, Scanner, Scheduler, SignalLog};
use telegram_ctrl::{startup_message, TelegramNotifier};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    info!(
        interval = %cfg.kline_interval,
        limit = cfg.kline_limit,
        period = ?cfg.scan_period,
        concurrency = cfg.scan_concurrency,
        log = %cfg.signal_log_path.display(),
        "Scanbot starting"
    );

    // ── Collaborators ─────────────────────────────────────────────────────────
    let provider: Arc<dyn MarketDataProvider> = match BinanceClient::from_config(&cfg) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };
    let notifier: Arc<dyn Notifier> =
        Arc::new(TelegramNotifier::new(&cfg.telegram_token, &cfg.telegram_chat_id));

    notify_best_effort(notifier.as_ref(), &startup_message(cfg.scan_period)).await;

    // ── Scanner + scheduler ───────────────────────────────────────────────────
    let scanner = Scanner::new(
        provider,
        notifier,
        SignalLog::new(cfg.signal_log_path.clone()),
        ScanSettings::from_config(&cfg),
    );
    let (scheduler, _handle) = Scheduler::new(Arc::new(scanner), cfg.scan_period);
    let scheduler_task = tokio::spawn(scheduler.run());

    // Keep main alive until ctrl-c, or until the scheduler task ends
    info!("Scheduler started. Waiting for shutdown signal.");
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                error!("Failed to listen for shutdown signal: {e}");
            }
            info!("Shutdown signal received. Exiting.");
        }
        joined = scheduler_task => {
            match joined {
                Err(e) => error!("Scheduler task failed: {e}"),
                Ok(()) => error!("Scheduler stopped unexpectedly"),
            }
            std::process::exit(1);
        }
    }
}
