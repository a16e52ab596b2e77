//! RSI (Relative Strength Index) indicator

use crate::models::indicators::RsiIndicator;

/// Calculate RSI over the last `period` close-to-close changes.
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// Averages are simple, not Wilder-smoothed. A window without any movement reads 50.
pub fn calculate_rsi(closes: &[f64], period: u32) -> Option<RsiIndicator> {
    let period_len = period as usize;
    if period == 0 || closes.len() < period_len + 1 {
        return None;
    }

    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in closes[closes.len() - period_len - 1..].windows(2) {
        let change = pair[1] - pair[0];
        if change >= 0.0 {
            gains += change;
        } else {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    let value = if avg_gain == 0.0 && avg_loss == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    };

    Some(RsiIndicator { value, period })
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(closes: &[f64]) -> Option<RsiIndicator> {
    calculate_rsi(closes, 14)
}
