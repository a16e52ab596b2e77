//! InvestMal signal service.
//!
//! Two request/response operations sit on top of this crate: free-text generation routed
//! through the [`ai::ModelSwitcher`], and market analysis through the
//! [`signals::SignalEngine`], which combines deterministic indicators with an optional
//! language-model rationale.

pub mod ai;
pub mod common;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
