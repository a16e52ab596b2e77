//! Unit tests for SMA and SMA crossover

use crate::stubs::breakout_closes;
use investmal::indicators::trend::{calculate_sma, calculate_sma_crossover, crossover_state};

#[test]
fn test_sma_value_and_period() {
    let closes: Vec<f64> = (1..=20).map(f64::from).collect();
    let sma = calculate_sma(&closes, 20).unwrap();
    assert!((sma.value - 10.5).abs() < 1e-12);
    assert_eq!(sma.period, 20);
    assert!(calculate_sma(&closes, 21).is_none());
}

#[test]
fn test_crossover_bullish_after_breakout() {
    let cross = calculate_sma_crossover(&breakout_closes(60, 40, 1.0), 20, 50).unwrap();
    assert!(cross.fast > cross.slow);
    assert_eq!(crossover_state(&cross), 1);
}

#[test]
fn test_crossover_bearish_after_breakdown() {
    let cross = calculate_sma_crossover(&breakout_closes(60, 40, -1.0), 20, 50).unwrap();
    assert_eq!(crossover_state(&cross), -1);
}

#[test]
fn test_crossover_flat_is_neutral() {
    let cross = calculate_sma_crossover(&vec![100.0; 50], 20, 50).unwrap();
    assert_eq!(crossover_state(&cross), 0);
}

#[test]
fn test_crossover_needs_slow_window_and_ordered_periods() {
    assert!(calculate_sma_crossover(&vec![100.0; 49], 20, 50).is_none());
    assert!(calculate_sma_crossover(&vec![100.0; 80], 50, 20).is_none());
}
