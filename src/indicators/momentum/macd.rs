//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::models::indicators::MacdIndicator;

/// Calculate MACD indicator
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
pub fn calculate_macd(
    closes: &[f64],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Option<MacdIndicator> {
    if fast_period >= slow_period || closes.len() < slow_period as usize + signal_period as usize {
        return None;
    }

    let fast = math::ema_series(closes, fast_period as usize)?;
    let slow = math::ema_series(closes, slow_period as usize)?;

    // Both series end at the last close; align the fast one on the slow one's start.
    let offset = fast.len() - slow.len();
    let macd_values: Vec<f64> = slow
        .iter()
        .zip(&fast[offset..])
        .map(|(slow, fast)| fast - slow)
        .collect();

    let signal_line = math::ema(&macd_values, signal_period as usize)?;
    let macd_line = *macd_values.last()?;

    Some(MacdIndicator {
        macd: macd_line,
        signal: signal_line,
        histogram: macd_line - signal_line,
        periods: (fast_period, slow_period, signal_period),
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(closes: &[f64]) -> Option<MacdIndicator> {
    calculate_macd(closes, 12, 26, 9)
}
