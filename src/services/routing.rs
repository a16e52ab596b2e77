//! Per-symbol routing between the exchange feed and the simulator.

use crate::error::MarketDataError;
use crate::models::series::PriceSeries;
use crate::services::market_data::{AssetClass, MarketDataProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Crypto pairs go to the exchange; forex and equities go to the simulator.
///
/// With `fallback_to_simulation`, an exchange failure is served from the simulator
/// instead of surfacing as unavailable data.
pub struct RoutedMarketDataProvider {
    exchange: Arc<dyn MarketDataProvider>,
    simulator: Arc<dyn MarketDataProvider>,
    fallback_to_simulation: bool,
}

impl RoutedMarketDataProvider {
    pub fn new(
        exchange: Arc<dyn MarketDataProvider>,
        simulator: Arc<dyn MarketDataProvider>,
        fallback_to_simulation: bool,
    ) -> Self {
        Self {
            exchange,
            simulator,
            fallback_to_simulation,
        }
    }
}

#[async_trait]
impl MarketDataProvider for RoutedMarketDataProvider {
    async fn fetch_series(
        &self,
        symbol: &str,
        timeframe: &str,
        limit: usize,
    ) -> Result<PriceSeries, MarketDataError> {
        if AssetClass::of(symbol) != AssetClass::Crypto {
            debug!(symbol = %symbol, "Symbol not listed on exchange, simulating");
            return self.simulator.fetch_series(symbol, timeframe, limit).await;
        }

        match self.exchange.fetch_series(symbol, timeframe, limit).await {
            Ok(series) => Ok(series),
            Err(e) if self.fallback_to_simulation => {
                warn!(
                    symbol = %symbol,
                    timeframe = %timeframe,
                    error = %e,
                    "Exchange fetch failed, serving simulated data"
                );
                self.simulator.fetch_series(symbol, timeframe, limit).await
            }
            Err(e) => Err(e),
        }
    }
}
