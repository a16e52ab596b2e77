//! Process configuration loaded once from the environment.

use crate::error::ConfigError;
use crate::indicators::calculator::IndicatorConfig;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Accepted range for `CANDLE_LIMIT`; Binance serves at most 1000 klines per request.
pub const CANDLE_LIMIT_RANGE: std::ops::RangeInclusive<usize> = 1..=1000;

/// Credentials and endpoint for one language-model provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketDataSource {
    Binance,
    Simulated,
}

impl FromStr for MarketDataSource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binance" => Ok(Self::Binance),
            "simulated" | "simulation" => Ok(Self::Simulated),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketDataConfig {
    pub source: MarketDataSource,
    pub binance_base_url: String,
    pub timeout: Duration,
    pub candle_limit: usize,
    pub simulation_seed: Option<u64>,
    /// Serve simulated candles when the exchange fails for a listed symbol.
    pub simulation_fallback: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub debug: bool,
    pub port: u16,
    pub default_model: String,
    pub max_tokens: u32,
    pub backend_timeout: Duration,
    pub openai: ProviderSettings,
    pub anthropic: ProviderSettings,
    pub gemini: ProviderSettings,
    pub ollama: ProviderSettings,
    pub market_data: MarketDataConfig,
    pub indicators: IndicatorConfig,
    pub always_enrich: bool,
    /// Headlines added to rationale prompts; zero disables the news wire.
    pub news_headlines: usize,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let environment = var("ENV")
            .or_else(|| var("ENVIRONMENT"))
            .unwrap_or_else(|| "development".to_string());

        let market_source = match var("MARKET_DATA_SOURCE") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                variable: "MARKET_DATA_SOURCE".to_string(),
                value: raw.clone(),
            })?,
            None => MarketDataSource::Binance,
        };

        let defaults = IndicatorConfig::default();
        let indicators = IndicatorConfig {
            rsi_period: parse_or(&var, "RSI_PERIOD", defaults.rsi_period)?,
            rsi_oversold: parse_or(&var, "RSI_OVERSOLD", defaults.rsi_oversold)?,
            rsi_overbought: parse_or(&var, "RSI_OVERBOUGHT", defaults.rsi_overbought)?,
            sma_fast: parse_or(&var, "SMA_FAST", defaults.sma_fast)?,
            sma_slow: parse_or(&var, "SMA_SLOW", defaults.sma_slow)?,
            ..defaults
        };

        Ok(Self {
            environment,
            debug: parse_bool(&var, "DEBUG", false)?,
            port: parse_or(&var, "PORT", 8080)?,
            default_model: var("MODEL_NAME").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_tokens: parse_or(&var, "MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            backend_timeout: Duration::from_secs(parse_or(&var, "BACKEND_TIMEOUT_SECS", 30)?),
            openai: provider_settings(&var, "OPENAI"),
            anthropic: provider_settings(&var, "ANTHROPIC"),
            gemini: provider_settings(&var, "GEMINI"),
            ollama: provider_settings(&var, "OLLAMA"),
            market_data: MarketDataConfig {
                source: market_source,
                binance_base_url: var("BINANCE_BASE_URL")
                    .unwrap_or_else(|| "https://api.binance.com".to_string()),
                timeout: Duration::from_secs(parse_or(&var, "MARKET_DATA_TIMEOUT_SECS", 10)?),
                candle_limit: parse_candle_limit(&var)?,
                simulation_seed: var("SIMULATION_SEED")
                    .map(|raw| parse_value("SIMULATION_SEED", &raw))
                    .transpose()?,
                simulation_fallback: parse_bool(&var, "SIMULATION_FALLBACK", true)?,
            },
            indicators,
            always_enrich: parse_bool(&var, "ALWAYS_ENRICH", false)?,
            news_headlines: parse_or(&var, "NEWS_HEADLINES", 3)?,
        })
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

fn provider_settings<F>(var: &F, prefix: &str) -> ProviderSettings
where
    F: Fn(&str) -> Option<String>,
{
    let models = var(&format!("{prefix}_MODELS"))
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    ProviderSettings {
        api_key: var(&format!("{prefix}_API_KEY")),
        base_url: var(&format!("{prefix}_BASE_URL")),
        models,
    }
}

fn parse_value<T: FromStr>(variable: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        variable: variable.to_string(),
        value: raw.to_string(),
    })
}

fn parse_or<F, T>(var: &F, variable: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match var(variable) {
        Some(raw) => parse_value(variable, &raw),
        None => Ok(default),
    }
}

fn parse_candle_limit<F>(var: &F) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let limit = parse_or(var, "CANDLE_LIMIT", 100)?;
    if !CANDLE_LIMIT_RANGE.contains(&limit) {
        return Err(ConfigError::InvalidValue {
            variable: "CANDLE_LIMIT".to_string(),
            value: limit.to_string(),
        });
    }
    Ok(limit)
}

fn parse_bool<F>(var: &F, variable: &str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(variable) {
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                variable: variable.to_string(),
                value: raw,
            }),
        },
        None => Ok(default),
    }
}
