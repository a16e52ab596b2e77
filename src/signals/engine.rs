//! Signal engine: market data → indicators → majority vote → optional rationale.

use crate::ai::switcher::ModelSwitcher;
use crate::config::Config;
use crate::error::{AnalysisError, MarketDataError};
use crate::indicators::calculator::IndicatorCalculator;
use crate::metrics::Metrics;
use crate::models::indicators::IndicatorSet;
use crate::models::series::PriceSeries;
use crate::models::signal::Signal;
use crate::services::market_data::MarketDataProvider;
use crate::services::news::{rank_headlines, NewsItem, NewsProvider};
use crate::signals::aggregation::{Aggregator, BaseSignal};
use crate::signals::prompt::build_rationale_prompt;
use crate::signals::scoring::collect_votes;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_TIMEFRAME: &str = "1h";

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub candle_limit: usize,
    pub fetch_timeout: Duration,
    pub max_tokens: u32,
    /// Ask the default model for a rationale even when no model is named.
    pub always_enrich: bool,
    /// Ranked headlines included in rationale prompts.
    pub news_headlines: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            candle_limit: 100,
            fetch_timeout: Duration::from_secs(10),
            max_tokens: crate::config::DEFAULT_MAX_TOKENS,
            always_enrich: false,
            news_headlines: 3,
        }
    }
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            candle_limit: config.market_data.candle_limit,
            fetch_timeout: config.market_data.timeout,
            max_tokens: config.max_tokens,
            always_enrich: config.always_enrich,
            news_headlines: config.news_headlines,
        }
    }
}

pub struct SignalEngine {
    market_data: Arc<dyn MarketDataProvider>,
    switcher: Arc<ModelSwitcher>,
    calculator: IndicatorCalculator,
    settings: EngineSettings,
    metrics: Option<Arc<Metrics>>,
    news: Option<Arc<dyn NewsProvider>>,
}

impl SignalEngine {
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        switcher: Arc<ModelSwitcher>,
        calculator: IndicatorCalculator,
        settings: EngineSettings,
    ) -> Self {
        Self {
            market_data,
            switcher,
            calculator,
            settings,
            metrics: None,
            news: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_news(mut self, news: Arc<dyn NewsProvider>) -> Self {
        self.news = Some(news);
        self
    }

    /// Deterministic stage: indicators and their majority vote.
    pub fn evaluate(&self, series: &PriceSeries) -> (IndicatorSet, BaseSignal) {
        let indicators = self.calculator.compute(series);
        let votes = collect_votes(&indicators, self.calculator.config());
        (indicators, Aggregator::majority(votes))
    }

    /// Analyze a symbol on a timeframe, optionally explained by `model`.
    ///
    /// Rationale generation is best effort: its failure leaves `rationale` empty and
    /// never fails the analysis.
    pub async fn analyze(
        &self,
        symbol: &str,
        timeframe: &str,
        model: Option<&str>,
    ) -> Result<Signal, AnalysisError> {
        let symbol = symbol.trim().to_ascii_uppercase();
        if symbol.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "Symbol cannot be empty".to_string(),
            ));
        }
        let timeframe = match timeframe.trim() {
            "" => DEFAULT_TIMEFRAME.to_string(),
            tf => tf.to_string(),
        };
        let model = model.map(str::trim).filter(|m| !m.is_empty());

        let series = self.fetch(&symbol, &timeframe).await?;
        let (indicators, base) = self.evaluate(&series);
        debug!(
            symbol = %symbol,
            timeframe = %timeframe,
            candles = series.len(),
            indicators = indicators.len(),
            direction = %base.direction,
            confidence = base.confidence,
            "Computed base signal"
        );

        let rationale = if model.is_some() || self.settings.always_enrich {
            self.enrich(&symbol, &timeframe, &indicators, &base, model)
                .await
        } else {
            None
        };

        if let Some(metrics) = &self.metrics {
            metrics
                .signals_generated_total
                .with_label_values(&[base.direction.as_str()])
                .inc();
        }
        info!(
            symbol = %symbol,
            timeframe = %timeframe,
            direction = %base.direction,
            confidence = base.confidence,
            enriched = rationale.is_some(),
            "Signal generated"
        );

        Ok(Signal {
            symbol,
            timeframe,
            direction: base.direction,
            confidence: base.confidence,
            rationale,
            price: indicators.price,
            indicators,
            votes: base.votes,
            generated_at: Utc::now(),
        })
    }

    async fn fetch(&self, symbol: &str, timeframe: &str) -> Result<PriceSeries, AnalysisError> {
        let unavailable = |reason: String| AnalysisError::DataUnavailable {
            symbol: symbol.to_string(),
            timeframe: timeframe.to_string(),
            reason,
        };

        let fetched = tokio::time::timeout(
            self.settings.fetch_timeout,
            self.market_data
                .fetch_series(symbol, timeframe, self.settings.candle_limit),
        )
        .await
        .unwrap_or(Err(MarketDataError::Timeout(self.settings.fetch_timeout)));

        match fetched {
            Ok(series) if series.is_empty() => {
                warn!(symbol = %symbol, timeframe = %timeframe, "Market data source returned no candles");
                Err(unavailable("no candles returned".to_string()))
            }
            Ok(series) => Ok(series),
            Err(e) => {
                warn!(symbol = %symbol, timeframe = %timeframe, error = %e, "Market data fetch failed");
                Err(unavailable(e.to_string()))
            }
        }
    }

    async fn enrich(
        &self,
        symbol: &str,
        timeframe: &str,
        indicators: &IndicatorSet,
        base: &BaseSignal,
        model: Option<&str>,
    ) -> Option<String> {
        let headlines = self.headlines(symbol).await;
        let prompt = build_rationale_prompt(symbol, timeframe, indicators, base, &headlines);
        match self
            .switcher
            .generate(&prompt, model, self.settings.max_tokens)
            .await
        {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Rationale generation failed, returning quantitative signal only");
                if let Some(metrics) = &self.metrics {
                    metrics.signal_enrichment_failures_total.inc();
                }
                None
            }
        }
    }

    /// Most relevant recent headlines, highest impact first.
    async fn headlines(&self, symbol: &str) -> Vec<NewsItem> {
        let Some(news) = &self.news else {
            return Vec::new();
        };
        if self.settings.news_headlines == 0 {
            return Vec::new();
        }

        let mut ranked = rank_headlines(news.headlines(symbol).await, Utc::now());
        ranked.truncate(self.settings.news_headlines);
        debug!(symbol = %symbol, headlines = ranked.len(), "Attached wire headlines");
        ranked
    }
}
