//! Application transport: router, handlers and server bootstrap

pub mod http;

pub use http::*;
