//! Binance market data provider implementation

use crate::error::MarketDataError;
use crate::models::series::{Candle, PriceSeries};
use crate::services::market_data::MarketDataProvider;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub struct BinanceMarketDataProvider {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl BinanceMarketDataProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client, timeout))
    }

    pub fn with_client(base_url: impl Into<String>, client: Client, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout,
        }
    }
}

/// Exchange symbol for a display symbol: separators dropped, `USD` quoted as `USDT`.
pub fn binance_symbol(symbol: &str) -> String {
    let compact: String = symbol
        .chars()
        .filter(|c| !matches!(c, '/' | '-' | '_'))
        .collect::<String>()
        .to_ascii_uppercase();
    if compact.ends_with("USD") {
        format!("{compact}T")
    } else {
        compact
    }
}

/// Kline interval for a timeframe label; `D1` becomes `1d`.
pub fn binance_interval(timeframe: &str) -> String {
    let tf = timeframe.trim();
    if tf.eq_ignore_ascii_case("d1") {
        "1d".to_string()
    } else {
        tf.to_ascii_lowercase()
    }
}

/// Decode one kline row: `[openTime, "open", "high", "low", "close", "volume", ...]`.
fn parse_kline(row: &[Value]) -> Result<Candle, MarketDataError> {
    if row.len() < 6 {
        return Err(MarketDataError::Parse(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }

    let open_time = row[0]
        .as_i64()
        .ok_or_else(|| MarketDataError::Parse("kline open time is not an integer".to_string()))?;
    let timestamp = DateTime::from_timestamp_millis(open_time)
        .ok_or_else(|| MarketDataError::Parse(format!("invalid kline time {open_time}")))?;

    let field = |index: usize, name: &str| -> Result<f64, MarketDataError> {
        match &row[index] {
            Value::String(s) => s
                .parse::<f64>()
                .map_err(|e| MarketDataError::Parse(format!("invalid {name}: {e}"))),
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| MarketDataError::Parse(format!("invalid {name}"))),
            _ => Err(MarketDataError::Parse(format!("invalid {name}"))),
        }
    };

    Ok(Candle::new(
        field(1, "open")?,
        field(2, "high")?,
        field(3, "low")?,
        field(4, "close")?,
        field(5, "volume")?,
        timestamp,
    ))
}

#[async_trait]
impl MarketDataProvider for BinanceMarketDataProvider {
    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<PriceSeries, MarketDataError> {
        let exchange_symbol = binance_symbol(symbol);
        let interval = binance_interval(timeframe);
        debug!(
            symbol = %exchange_symbol,
            interval = %interval,
            limit = limit,
            "Fetching klines from Binance"
        );

        let limit = limit.to_string();
        let response = self
            .client
            .get(format!("{}/api/v3/klines", self.base_url))
            .query(&[
                ("symbol", exchange_symbol.as_str()),
                ("interval", interval.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout(self.timeout)
                } else {
                    MarketDataError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<Vec<Value>> = response
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        let candles = rows
            .iter()
            .map(|row| parse_kline(row))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(symbol = %exchange_symbol, count = candles.len(), "Fetched klines");
        PriceSeries::new(symbol, timeframe, candles)
    }
}
