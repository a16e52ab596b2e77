//! Seeded random-walk market data for offline development and demos.

use crate::error::MarketDataError;
use crate::models::series::{Candle, PriceSeries};
use crate::services::market_data::{timeframe_duration, AssetClass, MarketDataProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const VOLATILITY: f64 = 0.003;

pub struct SimulatedMarketDataProvider {
    seed: Option<u64>,
}

impl SimulatedMarketDataProvider {
    /// With `None`, each symbol gets a stable seed derived from its name.
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    fn seed_for(&self, symbol: &str, timeframe: &str) -> u64 {
        self.seed.unwrap_or_else(|| {
            let mut hasher = DefaultHasher::new();
            symbol.hash(&mut hasher);
            timeframe.hash(&mut hasher);
            hasher.finish()
        })
    }

    /// Random walk ending at `end`, one candle per `step`.
    pub fn generate(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, MarketDataError> {
        let step = timeframe_duration(timeframe)
            .ok_or_else(|| MarketDataError::UnsupportedTimeframe(timeframe.to_string()))?;
        let mut rng = StdRng::seed_from_u64(self.seed_for(symbol, timeframe));

        let mut price = start_price(symbol);
        let mut time = end - step * limit as i32;
        let mut candles = Vec::with_capacity(limit);

        for _ in 0..limit {
            let movement = (rng.gen::<f64>() - 0.48) * price * VOLATILITY;
            let open = price;
            let close = open + movement;
            let wick = (movement * 0.5).abs();
            let volume = rng.gen_range(0..5000) as f64;

            time += step;
            candles.push(Candle::new(
                open,
                open.max(close) + wick,
                open.min(close) - wick,
                close,
                volume,
                time,
            ));
            price = close;
        }

        PriceSeries::new(symbol, timeframe, candles)
    }
}

/// Rough starting level by asset class.
fn start_price(symbol: &str) -> f64 {
    match AssetClass::of(symbol) {
        AssetClass::Crypto if symbol.to_ascii_uppercase().starts_with("ETH") => 3_500.0,
        AssetClass::Crypto => 65_000.0,
        AssetClass::Forex => 1.08,
        AssetClass::Equity => 4_500.0,
    }
}

#[async_trait]
impl MarketDataProvider for SimulatedMarketDataProvider {
    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<PriceSeries, MarketDataError> {
        let step = timeframe_duration(timeframe)
            .ok_or_else(|| MarketDataError::UnsupportedTimeframe(timeframe.to_string()))?;
        // Align to the most recent step boundary so candles are stable within a step.
        let now = Utc::now().timestamp();
        let step_secs = step.num_seconds().max(1);
        let end = DateTime::from_timestamp(now - now.rem_euclid(step_secs), 0)
            .unwrap_or_else(Utc::now);

        self.generate(symbol, timeframe, limit, end)
    }
}
