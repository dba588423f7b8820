//! surfmon Common - Shared utilities: logging and configuration
//!
//! This crate provides common functionality used by the surfmon binary and engine.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigBuilder, DEFAULT_MAX_ENTRIES, MAX_ENTRIES_LIMIT};
pub use logging::{init_logging_with_config, LogConfig, LogFormat};
