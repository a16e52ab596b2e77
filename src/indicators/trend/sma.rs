//! SMA (Simple Moving Average) indicator and crossover

use crate::common::math;
use crate::models::indicators::{SmaCrossover, SmaIndicator};

/// Calculate SMA for a specific period
pub fn calculate_sma(closes: &[f64], period: u32) -> Option<SmaIndicator> {
    let value = math::sma(closes, period as usize)?;
    Some(SmaIndicator { value, period })
}

/// Compare a fast SMA against a slow one (e.g. SMA 20 against SMA 50)
pub fn calculate_sma_crossover(
    closes: &[f64],
    fast_period: u32,
    slow_period: u32,
) -> Option<SmaCrossover> {
    if fast_period >= slow_period {
        return None;
    }
    let fast = calculate_sma(closes, fast_period)?;
    let slow = calculate_sma(closes, slow_period)?;

    Some(SmaCrossover {
        fast: fast.value,
        slow: slow.value,
        fast_period,
        slow_period,
    })
}

/// Crossover state: 1 when fast is above slow, -1 below, 0 when equal
pub fn crossover_state(cross: &SmaCrossover) -> i32 {
    if cross.fast > cross.slow {
        1
    } else if cross.fast < cross.slow {
        -1
    } else {
        0
    }
}
