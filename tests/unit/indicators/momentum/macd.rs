//! Unit tests for MACD indicator

use crate::stubs::breakout_closes;
use investmal::indicators::momentum::{calculate_macd, calculate_macd_default};

#[test]
fn test_macd_requires_slow_plus_signal_closes() {
    assert!(calculate_macd_default(&vec![100.0; 34]).is_none());
    assert!(calculate_macd_default(&vec![100.0; 35]).is_some());
}

#[test]
fn test_macd_rejects_fast_not_below_slow() {
    let closes = vec![100.0; 100];
    assert!(calculate_macd(&closes, 26, 26, 9).is_none());
    assert!(calculate_macd(&closes, 30, 26, 9).is_none());
}

#[test]
fn test_macd_constant_series_is_zero() {
    let macd = calculate_macd_default(&vec![250.0; 60]).unwrap();
    assert!(macd.macd.abs() < 1e-9);
    assert!(macd.signal.abs() < 1e-9);
    assert!(macd.histogram.abs() < 1e-9);
    assert_eq!(macd.periods, (12, 26, 9));
}

#[test]
fn test_macd_histogram_positive_after_breakout() {
    let macd = calculate_macd_default(&breakout_closes(60, 40, 1.0)).unwrap();
    assert!(macd.macd > 0.0);
    assert!(macd.histogram > 0.0);
    assert!((macd.histogram - (macd.macd - macd.signal)).abs() < 1e-12);
}

#[test]
fn test_macd_histogram_negative_after_breakdown() {
    let macd = calculate_macd_default(&breakout_closes(60, 40, -1.0)).unwrap();
    assert!(macd.macd < 0.0);
    assert!(macd.histogram < 0.0);
}
