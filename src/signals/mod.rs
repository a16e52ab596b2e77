//! Signal derivation and the analysis pipeline.

pub mod aggregation;
pub mod engine;
pub mod prompt;
pub mod scoring;

pub use aggregation::*;
pub use engine::{EngineSettings, SignalEngine};
pub use scoring::*;
