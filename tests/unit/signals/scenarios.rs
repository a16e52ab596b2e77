//! Market regime scenarios run through the deterministic stage of the signal engine

use crate::stubs::{breakout_closes, series_from_closes, StubBackend, StubMarketData};
use investmal::ai::{BackendRegistry, ModelSwitcher};
use investmal::indicators::calculator::IndicatorCalculator;
use investmal::models::signal::SignalDirection;
use investmal::services::llm::SharedBackend;
use investmal::services::market_data::MarketDataProvider;
use investmal::signals::aggregation::BaseSignal;
use investmal::signals::engine::{EngineSettings, SignalEngine};
use std::sync::Arc;
use std::time::Duration;

fn evaluate(closes: &[f64]) -> BaseSignal {
    let backend: SharedBackend = StubBackend::echo("stub/default");
    let registry = Arc::new(BackendRegistry::new("stub-model", backend));
    let switcher = Arc::new(ModelSwitcher::new(registry, Duration::from_secs(1)));
    let market: Arc<dyn MarketDataProvider> = StubMarketData::with_closes(Vec::new());
    let engine = SignalEngine::new(
        market,
        switcher,
        IndicatorCalculator::default(),
        EngineSettings::default(),
    );

    let (_, base) = engine.evaluate(&series_from_closes("BTCUSD", "1h", closes));
    base
}

#[test]
fn test_breakout_to_the_upside_is_buy() {
    let base = evaluate(&breakout_closes(60, 40, 1.0));
    assert_eq!(base.direction, SignalDirection::Buy);
    assert!((base.confidence - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_breakdown_is_sell() {
    let base = evaluate(&breakout_closes(60, 40, -1.0));
    assert_eq!(base.direction, SignalDirection::Sell);
    assert!((base.confidence - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_flat_market_is_unanimous_hold() {
    let base = evaluate(&vec![100.0; 100]);
    assert_eq!(base.direction, SignalDirection::Hold);
    assert_eq!(base.confidence, 1.0);
    assert_eq!(base.votes.len(), 3);
}

#[test]
fn test_ranging_market_is_hold() {
    let closes: Vec<f64> = (0..100)
        .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
        .collect();
    let base = evaluate(&closes);
    assert_eq!(base.direction, SignalDirection::Hold);
    assert!(base.confidence >= 2.0 / 3.0 - 1e-12);
}

#[test]
fn test_insufficient_history_is_hold_without_votes() {
    let base = evaluate(&vec![100.0; 10]);
    assert_eq!(base.direction, SignalDirection::Hold);
    assert_eq!(base.confidence, 0.0);
    assert!(base.votes.is_empty());
}

#[test]
fn test_only_rsi_votes_on_short_history() {
    // 15 rising closes: only RSI is computable and it reads overbought
    let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
    let base = evaluate(&closes);
    assert_eq!(base.votes.len(), 1);
    assert_eq!(base.direction, SignalDirection::Sell);
    assert_eq!(base.confidence, 1.0);
}
