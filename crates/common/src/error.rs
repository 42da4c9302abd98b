use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Network failure, non-success status or undecodable body from the exchange.
    #[error("Market data provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Insufficient history for {indicator}: need {required} candles, got {available}")]
    InsufficientHistory {
        indicator: &'static str,
        required: usize,
        available: usize,
    },

    #[error("Notifier failure: {0}")]
    NotifierFailure(String),

    #[error("Configuration error: {0}")]
    ConfigurationMissing(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
