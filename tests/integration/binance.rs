//! Integration tests for the Binance kline provider

use crate::stubs::StubBackend;
use investmal::ai::{BackendRegistry, ModelSwitcher};
use investmal::config::Config;
use investmal::core::http::build_market_data;
use investmal::error::{AnalysisError, MarketDataError};
use investmal::indicators::calculator::IndicatorCalculator;
use investmal::services::llm::SharedBackend;
use investmal::signals::engine::{EngineSettings, SignalEngine};
use std::sync::Arc;
use investmal::services::binance::{binance_interval, binance_symbol, BinanceMarketDataProvider};
use investmal::services::market_data::MarketDataProvider;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> BinanceMarketDataProvider {
    BinanceMarketDataProvider::new(server.uri(), Duration::from_secs(2)).unwrap()
}

#[test]
fn symbols_and_intervals_are_translated() {
    assert_eq!(binance_symbol("BTCUSD"), "BTCUSDT");
    assert_eq!(binance_symbol("eth/usd"), "ETHUSDT");
    assert_eq!(binance_symbol("SOL-USDT"), "SOLUSDT");
    assert_eq!(binance_interval("D1"), "1d");
    assert_eq!(binance_interval("4H"), "4h");
}

#[tokio::test]
async fn fetches_and_parses_klines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "BTCUSDT"))
        .and(query_param("interval", "1h"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [1717200000000i64, "67000.1", "67100.0", "66900.0", "67050.5", "12.5", 1717203599999i64],
            [1717203600000i64, "67050.5", "67200.0", "67000.0", "67150.0", "8.25", 1717207199999i64],
            [1717207200000i64, 67150.0, 67300.0, 67100.0, 67250.0, 4.0, 1717210799999i64]
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let series = provider(&server)
        .fetch_series("BTCUSD", "1h", 3)
        .await
        .unwrap();

    assert_eq!(series.symbol(), "BTCUSD");
    assert_eq!(series.len(), 3);
    assert_eq!(series.closes(), vec![67050.5, 67150.0, 67250.0]);
    let first = &series.candles()[0];
    assert_eq!(first.open, 67000.1);
    assert_eq!(first.volume, 12.5);
    assert_eq!(first.timestamp.timestamp_millis(), 1717200000000);
}

#[tokio::test]
async fn error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"code":-1121,"msg":"Invalid symbol."}"#),
        )
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch_series("NOPE", "1h", 10)
        .await
        .unwrap_err();
    match err {
        MarketDataError::Status { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("Invalid symbol"));
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn out_of_order_klines_are_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [1717203600000i64, "1", "1", "1", "1", "1"],
            [1717200000000i64, "1", "1", "1", "1", "1"]
        ])))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch_series("BTCUSD", "1h", 2)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::InvalidSeries(_)));
}

#[tokio::test]
async fn short_rows_are_parse_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([[1717200000000i64, "1"]])))
        .mount(&server)
        .await;

    let err = provider(&server)
        .fetch_series("BTCUSD", "1h", 1)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketDataError::Parse(_)));
}

fn routed_engine(server: &MockServer, fallback: &str) -> SignalEngine {
    let uri = server.uri();
    let config = Config::from_lookup(|key| match key {
        "BINANCE_BASE_URL" => Some(uri.clone()),
        "SIMULATION_FALLBACK" => Some(fallback.to_string()),
        "SIMULATION_SEED" => Some("5".to_string()),
        _ => None,
    })
    .unwrap();
    let default: SharedBackend = StubBackend::echo("stub/default");
    let switcher = Arc::new(ModelSwitcher::new(
        Arc::new(BackendRegistry::new("stub-model", default)),
        Duration::from_secs(1),
    ));

    SignalEngine::new(
        build_market_data(&config).unwrap(),
        switcher,
        IndicatorCalculator::default(),
        EngineSettings::from_config(&config),
    )
}

async fn mount_rejection(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(r#"{"code":-1121,"msg":"Invalid symbol."}"#),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn forex_symbols_are_simulated_without_calling_the_exchange() {
    let server = MockServer::start().await;
    mount_rejection(&server, 0).await;

    let signal = routed_engine(&server, "false")
        .analyze("EURUSD", "1h", None)
        .await
        .unwrap();
    assert_eq!(signal.symbol, "EURUSD");
    assert!(signal.price.is_some());
}

#[tokio::test]
async fn crypto_rejection_falls_back_to_simulation_when_enabled() {
    let server = MockServer::start().await;
    mount_rejection(&server, 1).await;

    let signal = routed_engine(&server, "true")
        .analyze("BTCUSD", "1h", None)
        .await
        .unwrap();
    assert!(signal.price.is_some());
}

#[tokio::test]
async fn crypto_rejection_is_unavailable_without_fallback() {
    let server = MockServer::start().await;
    mount_rejection(&server, 1).await;

    let err = routed_engine(&server, "false")
        .analyze("BTCUSD", "1h", None)
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::DataUnavailable { .. }));
}
