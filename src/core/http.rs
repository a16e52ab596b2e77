//! HTTP endpoint server using Axum

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::ai::registry::BackendRegistry;
use crate::ai::switcher::ModelSwitcher;
use crate::config::{Config, MarketDataSource};
use crate::error::{AnalysisError, GenerationError};
use crate::indicators::calculator::IndicatorCalculator;
use crate::metrics::Metrics;
use crate::models::signal::Signal;
use crate::services::binance::BinanceMarketDataProvider;
use crate::services::market_data::MarketDataProvider;
use crate::services::news::SimulatedNewsWire;
use crate::services::routing::RoutedMarketDataProvider;
use crate::services::simulated::SimulatedMarketDataProvider;
use crate::signals::engine::{EngineSettings, SignalEngine, DEFAULT_TIMEFRAME};

#[derive(Clone)]
pub struct AppState {
    pub health: HealthStatus,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub switcher: Arc<ModelSwitcher>,
    pub engine: Arc<SignalEngine>,
    pub max_tokens: u32,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// Errors surfaced to HTTP clients as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Upstream(detail) => (StatusCode::BAD_GATEWAY, detail.to_string()),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::InvalidInput(detail) => ApiError::BadRequest(detail),
            GenerationError::Exhausted { .. } => {
                ApiError::Upstream("Language model backend unavailable")
            }
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidInput(detail) => ApiError::BadRequest(detail),
            AnalysisError::DataUnavailable { .. } => ApiError::Upstream("Market data unavailable"),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

fn default_timeframe() -> String {
    DEFAULT_TIMEFRAME.to_string()
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub symbol: String,
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub signal: Signal,
}

pub async fn root() -> Json<Value> {
    Json(json!({ "status": "InvestMal AI Backend Running" }))
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = &state.health;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "investmal-ai-backend"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Registered model identifiers and the default
pub async fn list_models(State(state): State<AppState>) -> Json<Value> {
    let registry = state.switcher.registry();
    Json(json!({
        "default": registry.default_model(),
        "models": registry.models(),
    }))
}

/// Forward a prompt to the selected language model
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(request) = payload?;
    let response = state
        .switcher
        .generate(&request.prompt, request.model.as_deref(), state.max_tokens)
        .await
        .map_err(|e| {
            if matches!(e, GenerationError::Exhausted { .. }) {
                error!(error = %e, "Generation failed");
            }
            ApiError::from(e)
        })?;

    Ok(Json(GenerateResponse { response }))
}

/// Compute a trading signal for a symbol and timeframe
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(request) = payload?;
    let signal = state
        .engine
        .analyze(&request.symbol, &request.timeframe, request.model.as_deref())
        .await?;

    Ok(Json(AnalyzeResponse { signal }))
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/ai/models", get(list_models))
        .route("/ai/generate", post(generate))
        .route("/signals/analyze", post(analyze))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Market-data collaborator selected by configuration
pub fn build_market_data(
    config: &Config,
) -> Result<Arc<dyn MarketDataProvider>, Box<dyn std::error::Error>> {
    let simulator: Arc<dyn MarketDataProvider> = Arc::new(SimulatedMarketDataProvider::new(
        config.market_data.simulation_seed,
    ));
    let provider: Arc<dyn MarketDataProvider> = match config.market_data.source {
        MarketDataSource::Binance => {
            let exchange = Arc::new(BinanceMarketDataProvider::new(
                config.market_data.binance_base_url.clone(),
                config.market_data.timeout,
            )?);
            Arc::new(RoutedMarketDataProvider::new(
                exchange,
                simulator,
                config.market_data.simulation_fallback,
            ))
        }
        MarketDataSource::Simulated => {
            warn!("Using simulated market data");
            simulator
        }
    };
    Ok(provider)
}

/// Wire registry, switcher and engine from configuration into router state
pub fn build_state(config: &Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let registry = Arc::new(BackendRegistry::from_config(config)?);
    let switcher = Arc::new(
        ModelSwitcher::new(registry, config.backend_timeout).with_metrics(metrics.clone()),
    );
    let mut engine = SignalEngine::new(
        build_market_data(config)?,
        switcher.clone(),
        IndicatorCalculator::new(config.indicators.clone()),
        EngineSettings::from_config(config),
    )
    .with_metrics(metrics.clone());
    if config.news_headlines > 0 {
        engine = engine.with_news(Arc::new(SimulatedNewsWire::new(
            config.market_data.simulation_seed,
            config.news_headlines * 2,
        )));
    }

    Ok(AppState {
        health: HealthStatus::default(),
        metrics,
        start_time: Arc::new(Instant::now()),
        switcher,
        engine: Arc::new(engine),
        max_tokens: config.max_tokens,
    })
}

pub async fn start_server(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config)?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        config.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
