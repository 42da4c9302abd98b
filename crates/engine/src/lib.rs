pub mod binance;
pub mod scanner;
pub mod scheduler;
pub mod signal_log;

pub use binance::BinanceClient;
pub use scanner::{ScanCycle, ScanSettings, Scanner};
pub use scheduler::{Scheduler, SchedulerHandle};
pub use signal_log::SignalLog;
