use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Indicator category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorCategory {
    Trend,
    Momentum,
    Volatility,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmaIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmaCrossover {
    pub fast: f64,
    pub slow: f64,
    pub fast_period: u32,
    pub slow_period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiIndicator {
    pub value: f64,
    pub period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub periods: (u32, u32, u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityIndicator {
    pub std_dev: f64,
    pub period: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Indicator {
    Sma(SmaIndicator),
    SmaCrossover(SmaCrossover),
    Rsi(RsiIndicator),
    Macd(MacdIndicator),
    Volatility(VolatilityIndicator),
}

impl Indicator {
    pub fn category(&self) -> IndicatorCategory {
        match self {
            Indicator::Sma(_) | Indicator::SmaCrossover(_) => IndicatorCategory::Trend,
            Indicator::Rsi(_) | Indicator::Macd(_) => IndicatorCategory::Momentum,
            Indicator::Volatility(_) => IndicatorCategory::Volatility,
        }
    }

    /// One-line rendering used in prompts and logs.
    pub fn describe(&self) -> String {
        match self {
            Indicator::Sma(sma) => format!("SMA({}) = {:.4}", sma.period, sma.value),
            Indicator::SmaCrossover(cross) => format!(
                "SMA({}) {:.4} vs SMA({}) {:.4} ({})",
                cross.fast_period,
                cross.fast,
                cross.slow_period,
                cross.slow,
                if cross.fast > cross.slow {
                    "fast above slow"
                } else if cross.fast < cross.slow {
                    "fast below slow"
                } else {
                    "flat"
                }
            ),
            Indicator::Rsi(rsi) => format!("RSI({}) = {:.2}", rsi.period, rsi.value),
            Indicator::Macd(macd) => format!(
                "MACD{:?} line {:.4}, signal {:.4}, histogram {:.4}",
                macd.periods, macd.macd, macd.signal, macd.histogram
            ),
            Indicator::Volatility(vol) => {
                format!("Volatility StdDev({}) = {:.4}", vol.period, vol.std_dev)
            }
        }
    }
}

/// Indicators computed for one series, keyed by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub values: BTreeMap<String, Indicator>,
}

impl IndicatorSet {
    pub fn new(price: Option<f64>) -> Self {
        Self {
            price,
            values: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, indicator: Indicator) {
        self.values.insert(name.into(), indicator);
    }

    pub fn get(&self, name: &str) -> Option<&Indicator> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Indicator)> {
        self.values.iter()
    }
}
