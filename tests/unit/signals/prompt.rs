//! Unit tests for the rationale prompt

use crate::stubs::{breakout_closes, series_from_closes};
use investmal::indicators::calculator::{IndicatorCalculator, IndicatorConfig};
use chrono::Utc;
use investmal::models::indicators::IndicatorSet;
use investmal::services::news::{Impact, NewsItem};
use investmal::signals::aggregation::Aggregator;
use investmal::signals::prompt::build_rationale_prompt;
use investmal::signals::scoring::collect_votes;

#[test]
fn test_prompt_lists_context_indicators_and_signal() {
    let series = series_from_closes("BTCUSD", "4h", &breakout_closes(60, 40, 1.0));
    let set = IndicatorCalculator::default().compute(&series);
    let base = Aggregator::majority(collect_votes(&set, &IndicatorConfig::default()));

    let prompt = build_rationale_prompt("BTCUSD", "4h", &set, &base, &[]);

    assert!(prompt.contains("InvestMal AI"));
    assert!(prompt.contains("Asset: BTCUSD"));
    assert!(prompt.contains("Timeframe: 4h"));
    assert!(prompt.contains("Current Price: 140.00"));
    assert!(prompt.contains("- rsi: RSI(14) = 100.00"));
    assert!(prompt.contains("- sma_crossover: BUY"));
    assert!(prompt.contains("- rsi: SELL"));
    assert!(prompt.contains("Quantitative signal: BUY with 67% indicator agreement."));
    assert!(!prompt.contains("Recent Wire Headlines"));
}

#[test]
fn test_prompt_without_history() {
    let base = Aggregator::majority(Vec::new());
    let prompt = build_rationale_prompt("EURUSD", "1d", &IndicatorSet::new(None), &base, &[]);

    assert!(prompt.contains("Current Price: unavailable"));
    assert!(prompt.contains("- none (insufficient history)"));
    assert!(prompt.contains("Quantitative signal: HOLD with 0% indicator agreement."));
}

#[test]
fn test_prompt_lists_headlines_before_signal() {
    let base = Aggregator::majority(Vec::new());
    let headlines = vec![
        NewsItem::new("Reuters", "Fed signals rate cut in March", Utc::now()),
        NewsItem::new("CoinDesk", "Exchange volume climbs", Utc::now()),
    ];
    assert_eq!(headlines[0].impact, Impact::High);

    let prompt = build_rationale_prompt("BTCUSD", "1h", &IndicatorSet::new(None), &base, &headlines);

    let section = prompt.find("Recent Wire Headlines:").expect("headline section");
    let signal = prompt.find("Quantitative signal:").unwrap();
    assert!(section < signal);
    assert!(prompt.contains("- [Reuters] Fed signals rate cut in March (High impact)"));
    assert!(prompt.contains("- [CoinDesk] Exchange volume climbs (Medium impact)"));
}
