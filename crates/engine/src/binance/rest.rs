use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::de::IgnoredAny;
use serde::Deserialize;
use sha2::Sha256;
use tracing::debug;

use common::{Candle, Config, Error, MarketDataProvider, Result};

/// REST API client for Binance spot market data.
pub struct BinanceClient {
    api_key: String,
    secret: String,
    base_url: String,
    http: Client,
}

impl BinanceClient {
    pub fn new(
        api_key: impl Into<String>,
        secret: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ProviderUnavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            secret: secret.into(),
            base_url: base_url.into(),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            &cfg.binance_api_key,
            &cfg.binance_secret,
            &cfg.binance_base_url,
            cfg.request_timeout,
        )
    }

    fn timestamp_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    /// Hex HMAC-SHA256 of `query`, keyed by the API secret.
    pub fn sign(&self, query: &str) -> String {
        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// URL-encode `params`, append a timestamp and the signature over both.
    /// Needed only by authenticated endpoints; market data is public.
    pub fn signed_query(&self, params: &[(&str, &str)]) -> String {
        let ts = Self::timestamp_ms().to_string();
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter().copied())
            .append_pair("timestamp", &ts)
            .finish();
        let signature = self.sign(&query);
        format!("{query}&signature={signature}")
    }

    async fn public_get(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, ?params, "Binance GET");

        let resp = self
            .http
            .get(&url)
            .query(params)
            .header("X-MBX-APIKEY", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::ProviderUnavailable(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::ProviderUnavailable(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::ProviderUnavailable(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

#[async_trait]
impl MarketDataProvider for BinanceClient {
    async fn list_tradable_usdt_symbols(&self) -> Result<Vec<String>> {
        let body = self.public_get("/api/v3/exchangeInfo", &[]).await?;
        parse_usdt_symbols(&body)
    }

    async fn get_recent_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let params = [
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];
        let body = self.public_get("/api/v3/klines", &params).await?;
        parse_klines(&body)
    }
}

/// Symbols quoted in USDT whose status is `TRADING`.
pub fn parse_usdt_symbols(body: &str) -> Result<Vec<String>> {
    let info: ExchangeInfo = serde_json::from_str(body)
        .map_err(|e| Error::ProviderUnavailable(format!("bad exchangeInfo body: {e}")))?;

    Ok(info
        .symbols
        .into_iter()
        .filter(|s| s.symbol.contains("USDT") && s.quote_asset == "USDT" && s.status == "TRADING")
        .map(|s| s.symbol)
        .collect())
}

/// Decode the array-of-arrays kline payload.
pub fn parse_klines(body: &str) -> Result<Vec<Candle>> {
    let rows: Vec<RawKline> = serde_json::from_str(body)
        .map_err(|e| Error::ProviderUnavailable(format!("bad klines body: {e}")))?;

    rows.into_iter().map(RawKline::into_candle).collect()
}

// ─── Response types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SymbolInfo {
    symbol: String,
    status: String,
    quote_asset: String,
}

/// `[openTime, open, high, low, close, volume, closeTime, quoteVolume,
///   trades, takerBuyBase, takerBuyQuote, ignore]`
#[derive(Deserialize)]
struct RawKline(
    i64,
    String,
    String,
    String,
    String,
    String,
    i64,
    String,
    u64,
    IgnoredAny,
    IgnoredAny,
    IgnoredAny,
);

impl RawKline {
    fn into_candle(self) -> Result<Candle> {
        Ok(Candle {
            open_time: millis(self.0)?,
            open: decimal(&self.1)?,
            high: decimal(&self.2)?,
            low: decimal(&self.3)?,
            close: decimal(&self.4)?,
            volume: decimal(&self.5)?,
            close_time: millis(self.6)?,
            quote_volume: decimal(&self.7)?,
            trades: self.8,
        })
    }
}

fn decimal(raw: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|e| Error::ProviderUnavailable(format!("bad numeric field '{raw}': {e}")))
}

fn millis(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| Error::ProviderUnavailable(format!("bad timestamp {ms}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(secret: &str) -> BinanceClient {
        BinanceClient::new("key", secret, "https://api.binance.com", Duration::from_secs(1))
            .unwrap()
    }

    #[test]
    fn sign_matches_binance_reference_vector() {
        let c = client("NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j");
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1\
                     &recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            c.sign(query),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn signed_query_appends_timestamp_and_signature() {
        let c = client("secret");
        let q = c.signed_query(&[("symbol", "BTCUSDT"), ("note", "a b")]);
        assert!(q.starts_with("symbol=BTCUSDT&note=a+b&timestamp="), "{q}");

        let (unsigned, signature) = q.rsplit_once("&signature=").unwrap();
        assert_eq!(signature, c.sign(unsigned));
        assert_eq!(signature.len(), 64);
    }

    #[test]
    fn exchange_info_filters_to_trading_usdt_pairs() {
        let body = r#"{
            "timezone": "UTC",
            "symbols": [
                {"symbol": "BTCUSDT", "status": "TRADING", "baseAsset": "BTC", "quoteAsset": "USDT"},
                {"symbol": "ETHBTC", "status": "TRADING", "baseAsset": "ETH", "quoteAsset": "BTC"},
                {"symbol": "LUNAUSDT", "status": "BREAK", "baseAsset": "LUNA", "quoteAsset": "USDT"},
                {"symbol": "USDTTRY", "status": "TRADING", "baseAsset": "USDT", "quoteAsset": "TRY"},
                {"symbol": "SOLUSDT", "status": "TRADING", "baseAsset": "SOL", "quoteAsset": "USDT"}
            ]
        }"#;
        let symbols = parse_usdt_symbols(body).unwrap();
        assert_eq!(symbols, vec!["BTCUSDT", "SOLUSDT"]);
    }

    #[test]
    fn klines_rows_are_decoded() {
        let body = r#"[
            [1499040000000, "0.01634790", "0.80000000", "0.01575800", "0.01577100",
             "148976.11427815", 1499644799999, "2434.19055334", 308,
             "1756.87402397", "28.46694368", "0"]
        ]"#;
        let candles = parse_klines(body).unwrap();
        assert_eq!(candles.len(), 1);
        let c = &candles[0];
        assert_eq!(c.open_time.timestamp_millis(), 1499040000000);
        assert_eq!(c.close_time.timestamp_millis(), 1499644799999);
        assert!((c.close - 0.015771).abs() < 1e-12);
        assert!((c.high - 0.8).abs() < 1e-12);
        assert_eq!(c.trades, 308);
    }

    #[test]
    fn malformed_klines_are_provider_errors() {
        let body = r#"[[1499040000000, "abc", "1", "1", "1", "1", 1499644799999, "1", 1, "0", "0", "0"]]"#;
        assert!(matches!(parse_klines(body), Err(Error::ProviderUnavailable(_))));

        let body = r#"{"code": -1121, "msg": "Invalid symbol."}"#;
        assert!(matches!(parse_klines(body), Err(Error::ProviderUnavailable(_))));
    }

    #[test]
    fn empty_klines_array_is_empty_series() {
        assert!(parse_klines("[]").unwrap().is_empty());
    }
}
