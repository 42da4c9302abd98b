pub mod config;
pub mod error;
pub mod notifier;
pub mod provider;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use notifier::{notify_best_effort, Notifier};
pub use provider::MarketDataProvider;
pub use types::*;
