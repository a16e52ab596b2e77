//! Language-model provider adapters.

pub mod backend;
pub mod messages;

pub use backend::{BackendAdapter, HttpBackend, ProviderConfig, ProviderKind, SharedBackend};
pub use messages::RawResponse;
