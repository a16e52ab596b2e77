//! External collaborators: language-model providers, market-data sources and the news wire.

pub mod binance;
pub mod llm;
pub mod market_data;
pub mod news;
pub mod routing;
pub mod simulated;
