// src/models/mod.rs

//! Domain models for the ECO code service.

mod config;
mod opening;

// Re-export all public types
pub use config::{CacheConfig, Config, PORT_ENV, SOURCE_URL_ENV, ServerConfig, SourceConfig};
pub use opening::Opening;
