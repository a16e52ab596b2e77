//! Error taxonomy shared by the switcher, the signal engine and their collaborators.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single language-model backend call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend timed out after {0:?}")]
    Timeout(Duration),

    #[error("backend rejected credentials (status {0})")]
    Unauthorized(u16),

    #[error("backend quota or rate limit exceeded")]
    RateLimited,

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),

    #[error("backend returned no text")]
    EmptyResponse,
}

/// A non-empty model identifier that no backend is registered under.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown model: {0}")]
pub struct UnknownModelError(pub String);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The resolved backend and, where applicable, the default backend both failed.
    #[error("generation failed on {model}: {source}")]
    Exhausted {
        model: String,
        #[source]
        source: ProviderError,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    #[error("market data request failed: {0}")]
    Request(String),

    #[error("market data request timed out after {0:?}")]
    Timeout(Duration),

    #[error("market data source returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse market data: {0}")]
    Parse(String),

    #[error("invalid price series: {0}")]
    InvalidSeries(String),

    #[error("unsupported timeframe: {0}")]
    UnsupportedTimeframe(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("market data unavailable for {symbol} {timeframe}: {reason}")]
    DataUnavailable {
        symbol: String,
        timeframe: String,
        reason: String,
    },
}

/// Startup configuration problems. Any of these aborts the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing credentials for {provider}: set {variable}")]
    MissingCredentials {
        provider: &'static str,
        variable: &'static str,
    },

    #[error("invalid value for {variable}: {value}")]
    InvalidValue { variable: String, value: String },

    #[error("cannot determine provider for model {0}")]
    UnknownProvider(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
