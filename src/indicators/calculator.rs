//! Deterministic indicator computation over a price series.

use crate::indicators::momentum::{calculate_macd, calculate_rsi};
use crate::indicators::trend::{calculate_sma, calculate_sma_crossover};
use crate::indicators::volatility::calculate_volatility;
use crate::models::indicators::{Indicator, IndicatorSet};
use crate::models::series::PriceSeries;

pub const SMA_FAST: &str = "sma_fast";
pub const SMA_SLOW: &str = "sma_slow";
pub const SMA_CROSSOVER: &str = "sma_crossover";
pub const RSI: &str = "rsi";
pub const MACD: &str = "macd";
pub const VOLATILITY: &str = "volatility";

/// Indicator windows and RSI voting thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    pub sma_fast: u32,
    pub sma_slow: u32,
    pub rsi_period: u32,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    pub volatility_period: u32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_fast: 20,
            sma_slow: 50,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            volatility_period: 20,
        }
    }
}

/// Pure indicator calculator; holds only its configuration.
#[derive(Debug, Clone, Default)]
pub struct IndicatorCalculator {
    config: IndicatorConfig,
}

impl IndicatorCalculator {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Compute every indicator the series is long enough for.
    ///
    /// Indicators whose window exceeds the series are left out of the set.
    pub fn compute(&self, series: &PriceSeries) -> IndicatorSet {
        let cfg = &self.config;
        let closes = series.closes();
        let mut set = IndicatorSet::new(series.last_close());

        if let Some(sma) = calculate_sma(&closes, cfg.sma_fast) {
            set.insert(SMA_FAST, Indicator::Sma(sma));
        }
        if let Some(sma) = calculate_sma(&closes, cfg.sma_slow) {
            set.insert(SMA_SLOW, Indicator::Sma(sma));
        }
        if let Some(cross) = calculate_sma_crossover(&closes, cfg.sma_fast, cfg.sma_slow) {
            set.insert(SMA_CROSSOVER, Indicator::SmaCrossover(cross));
        }
        if let Some(rsi) = calculate_rsi(&closes, cfg.rsi_period) {
            set.insert(RSI, Indicator::Rsi(rsi));
        }
        if let Some(macd) = calculate_macd(&closes, cfg.macd_fast, cfg.macd_slow, cfg.macd_signal)
        {
            set.insert(MACD, Indicator::Macd(macd));
        }
        if let Some(vol) = calculate_volatility(&closes, cfg.volatility_period) {
            set.insert(VOLATILITY, Indicator::Volatility(vol));
        }

        set
    }
}
