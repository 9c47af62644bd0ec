//! Configuration management for the travel-record conversation engine
//!
//! Supports loading configuration from:
//! - YAML files (`config/default.yaml`, `config/{env}.yaml`)
//! - Environment variables (`TRAVEL_CHAT__` prefix, `__` separator)
//!
//! Business constants shared by every crate live in [`constants`].

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, EngineConfig, ObservabilityConfig, RuntimeEnvironment, Settings, StoreBackend,
    StoreConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
