//! Prometheus metrics for the HTTP surface, the model switcher and the signal engine.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Metric handles bound to a private registry, so several instances can coexist in tests.
pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: IntGauge,
    pub llm_backend_invocations_total: IntCounterVec,
    pub llm_fallbacks_total: IntCounter,
    pub signals_generated_total: IntCounterVec,
    pub signal_enrichment_failures_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total HTTP requests served")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight =
            IntGauge::new("http_requests_in_flight", "HTTP requests currently in flight")?;
        let llm_backend_invocations_total = IntCounterVec::new(
            Opts::new(
                "llm_backend_invocations_total",
                "Language-model backend invocations by backend and outcome",
            ),
            &["backend", "outcome"],
        )?;
        let llm_fallbacks_total = IntCounter::new(
            "llm_fallbacks_total",
            "Generations rerouted to the default backend",
        )?;
        let signals_generated_total = IntCounterVec::new(
            Opts::new("signals_generated_total", "Signals produced by direction"),
            &["direction"],
        )?;
        let signal_enrichment_failures_total = IntCounter::new(
            "signal_enrichment_failures_total",
            "Signals delivered without rationale after a generation failure",
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(llm_backend_invocations_total.clone()))?;
        registry.register(Box::new(llm_fallbacks_total.clone()))?;
        registry.register(Box::new(signals_generated_total.clone()))?;
        registry.register(Box::new(signal_enrichment_failures_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            llm_backend_invocations_total,
            llm_fallbacks_total,
            signals_generated_total,
            signal_enrichment_failures_total,
        })
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
