use async_trait::async_trait;

use crate::{Candle, Result};

pub const DEFAULT_INTERVAL: &str = "5m";
pub const DEFAULT_LIMIT: usize = 100;
/// Fewest candles on which every default indicator is defined (MACD
/// histogram: slow 26 + signal 9 - 1).
pub const MIN_CANDLES: usize = 34;

/// Source of symbol listings and recent candles.
///
/// `BinanceClient` implements this against the public REST API. The scanner
/// only ever holds an `Arc<dyn MarketDataProvider>`, so tests can swap in an
/// in-memory fake.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Actively trading pairs quoted in USDT. Re-fetched every scan cycle.
    async fn list_tradable_usdt_symbols(&self) -> Result<Vec<String>>;

    /// Up to `limit` most recent candles at `interval`, oldest first.
    /// May return fewer candles (or none) for young listings.
    async fn get_recent_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>>;
}
