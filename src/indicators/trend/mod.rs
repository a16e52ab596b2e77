//! Trend indicators: SMA, SMA crossover

pub mod sma;

pub use sma::*;
