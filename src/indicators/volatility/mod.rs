//! Volatility indicators

pub mod stddev;

pub use stddev::*;
