//! Language-model routing: backend registry and model switcher.

pub mod registry;
pub mod switcher;

pub use registry::{BackendRegistry, DEFAULT_ALIAS};
pub use switcher::{normalize, ModelSwitcher};
