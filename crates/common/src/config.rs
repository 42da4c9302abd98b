use std::path::PathBuf;
use std::time::Duration;

use crate::provider::{DEFAULT_INTERVAL, DEFAULT_LIMIT, MIN_CANDLES};
use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// All configuration loaded from environment variables at startup.
/// Missing required variables are reported as `Error::ConfigurationMissing`.
#[derive(Debug, Clone)]
pub struct Config {
    // Exchange credentials
    pub binance_api_key: String,
    pub binance_secret: String,
    pub binance_base_url: String,

    // Telegram
    pub telegram_token: String,
    pub telegram_chat_id: String,

    // Scan
    pub kline_interval: String,
    pub kline_limit: usize,
    pub scan_period: Duration,
    pub scan_concurrency: usize,
    pub request_timeout: Duration,

    // Append-only record of every analyzed symbol
    pub signal_log_path: PathBuf,
}

impl Config {
    /// Load all configuration from environment variables.
    /// Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let scan_concurrency: usize = env.parsed("SCAN_CONCURRENCY", 8)?;
        if scan_concurrency == 0 {
            return Err(invalid("SCAN_CONCURRENCY must be at least 1"));
        }

        let kline_limit: usize = env.parsed("KLINE_LIMIT", DEFAULT_LIMIT)?;
        if kline_limit < MIN_CANDLES {
            return Err(invalid(format!(
                "KLINE_LIMIT must be at least {MIN_CANDLES}, got {kline_limit}"
            )));
        }

        let scan_period: u64 = env.parsed("SCAN_PERIOD_SECS", 300)?;
        if scan_period == 0 {
            return Err(invalid("SCAN_PERIOD_SECS must be at least 1"));
        }

        let request_timeout: u64 = env.parsed("REQUEST_TIMEOUT_SECS", 10)?;
        if request_timeout == 0 {
            return Err(invalid("REQUEST_TIMEOUT_SECS must be at least 1"));
        }

        Ok(Config {
            binance_api_key: env.required("BINANCE_API_KEY")?,
            binance_secret: env.required("BINANCE_API_SECRET")?,
            binance_base_url: env
                .optional("BINANCE_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            telegram_token: env.required("TELEGRAM_BOT_TOKEN")?,
            telegram_chat_id: env.required("TELEGRAM_CHAT_ID")?,
            kline_interval: env
                .optional("KLINE_INTERVAL")
                .unwrap_or_else(|| DEFAULT_INTERVAL.to_string()),
            kline_limit,
            scan_period: Duration::from_secs(scan_period),
            scan_concurrency,
            request_timeout: Duration::from_secs(request_timeout),
            signal_log_path: env
                .optional("SIGNAL_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("signal_log.txt")),
        })
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::ConfigurationMissing(msg.into())
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn required(&self, key: &str) -> Result<String> {
        self.optional(key).ok_or_else(|| {
            Error::ConfigurationMissing(format!(
                "Required environment variable '{key}' is not set. Check your .env file."
            ))
        })
    }

    /// Blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.optional(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                Error::ConfigurationMissing(format!("{key} has an invalid value: '{raw}'"))
            }),
        }
    }
}
