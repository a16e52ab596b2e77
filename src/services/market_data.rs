//! Market data provider interface consumed by the signal engine.

use crate::error::MarketDataError;
use crate::models::series::PriceSeries;
use async_trait::async_trait;
use chrono::Duration;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Most recent `limit` candles for a symbol and timeframe, oldest first.
    ///
    /// An empty series is a valid answer; the caller decides what it means.
    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<PriceSeries, MarketDataError>;
}

/// Length of one candle for a timeframe label (`1m`, `4h`, `1d`, `D1`, ...).
pub fn timeframe_duration(timeframe: &str) -> Option<Duration> {
    match timeframe.trim().to_ascii_lowercase().as_str() {
        "1m" => Some(Duration::minutes(1)),
        "3m" => Some(Duration::minutes(3)),
        "5m" => Some(Duration::minutes(5)),
        "15m" => Some(Duration::minutes(15)),
        "30m" => Some(Duration::minutes(30)),
        "1h" => Some(Duration::hours(1)),
        "2h" => Some(Duration::hours(2)),
        "4h" => Some(Duration::hours(4)),
        "6h" => Some(Duration::hours(6)),
        "12h" => Some(Duration::hours(12)),
        "1d" | "d1" => Some(Duration::days(1)),
        "1w" => Some(Duration::weeks(1)),
        _ => None,
    }
}

/// Base assets quoted in USD stablecoins on Binance.
const CRYPTO_BASES: &[&str] = &[
    "BTC", "ETH", "SOL", "BNB", "XRP", "ADA", "DOGE", "AVAX", "DOT", "LINK", "LTC", "MATIC",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Crypto,
    Forex,
    Equity,
}

impl AssetClass {
    /// Classify a display symbol such as `BTCUSD`, `eth/usdt` or `EURUSD`.
    ///
    /// Crypto means a known base asset quoted in `USD`, `USDT` or `USDC`. Other
    /// six-letter alphabetic pairs read as forex; everything else as an equity or index.
    pub fn of(symbol: &str) -> Self {
        let compact: String = symbol
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();

        let base = ["USDT", "USDC", "USD"]
            .iter()
            .find_map(|quote| compact.strip_suffix(quote));
        if base.is_some_and(|base| CRYPTO_BASES.contains(&base)) {
            AssetClass::Crypto
        } else if compact.len() == 6 && compact.chars().all(|c| c.is_ascii_alphabetic()) {
            AssetClass::Forex
        } else {
            AssetClass::Equity
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Crypto => "Crypto",
            AssetClass::Forex => "Forex",
            AssetClass::Equity => "Equities",
        }
    }
}
