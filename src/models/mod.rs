//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod series;
pub mod signal;

pub use indicators::{
    Indicator, IndicatorCategory, IndicatorSet, MacdIndicator, RsiIndicator, SmaCrossover,
    SmaIndicator, VolatilityIndicator,
};
pub use series::{Candle, PriceSeries};
pub use signal::{IndicatorVote, Signal, SignalDirection};
