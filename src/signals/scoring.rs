//! Per-indicator directional votes

use crate::indicators::calculator::IndicatorConfig;
use crate::indicators::trend::crossover_state;
use crate::models::indicators::{Indicator, IndicatorSet};
use crate::models::signal::{IndicatorVote, SignalDirection};

/// Direction suggested by one indicator, or `None` for informational indicators.
///
/// - SMA crossover: fast above slow is bullish
/// - RSI: below the oversold level is bullish, above the overbought level bearish
/// - MACD: sign of the histogram
pub fn vote(indicator: &Indicator, config: &IndicatorConfig) -> Option<SignalDirection> {
    match indicator {
        Indicator::SmaCrossover(cross) => Some(match crossover_state(cross) {
            1 => SignalDirection::Buy,
            -1 => SignalDirection::Sell,
            _ => SignalDirection::Hold,
        }),
        Indicator::Rsi(rsi) => Some(if rsi.value < config.rsi_oversold {
            SignalDirection::Buy
        } else if rsi.value > config.rsi_overbought {
            SignalDirection::Sell
        } else {
            SignalDirection::Hold
        }),
        Indicator::Macd(macd) => Some(if macd.histogram > 0.0 {
            SignalDirection::Buy
        } else if macd.histogram < 0.0 {
            SignalDirection::Sell
        } else {
            SignalDirection::Hold
        }),
        Indicator::Sma(_) | Indicator::Volatility(_) => None,
    }
}

/// Votes of every voting indicator in the set, in name order.
pub fn collect_votes(set: &IndicatorSet, config: &IndicatorConfig) -> Vec<IndicatorVote> {
    set.iter()
        .filter_map(|(name, indicator)| {
            vote(indicator, config).map(|direction| IndicatorVote {
                indicator: name.clone(),
                direction,
            })
        })
        .collect()
}
