//! Binance spot klines over REST.

pub mod provider;

pub use provider::{binance_interval, binance_symbol, BinanceMarketDataProvider};
