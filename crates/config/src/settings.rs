//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{currency, dialogue, store};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - in-memory store allowed, plain logs
    #[default]
    Development,
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Dialogue engine configuration
    #[serde(default)]
    pub engine: EngineConfig,

    /// Context store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_engine()?;
        self.validate_store()?;
        Ok(())
    }

    fn validate_engine(&self) -> Result<(), ConfigError> {
        let engine = &self.engine;

        if !(1..=dialogue::MAX_RETRIES_CEILING).contains(&engine.max_retries) {
            return Err(ConfigError::InvalidValue {
                field: "engine.max_retries".to_string(),
                message: format!(
                    "Must be between 1 and {}, got {}",
                    dialogue::MAX_RETRIES_CEILING,
                    engine.max_retries
                ),
            });
        }

        if !currency::is_supported(&engine.default_currency) {
            return Err(ConfigError::InvalidValue {
                field: "engine.default_currency".to_string(),
                message: format!(
                    "Unsupported currency '{}', expected one of {:?}",
                    engine.default_currency,
                    currency::SUPPORTED
                ),
            });
        }

        Ok(())
    }

    fn validate_store(&self) -> Result<(), ConfigError> {
        let store = &self.store;

        if store.context_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "store.context_ttl_secs".to_string(),
                message: "TTL must be positive".to_string(),
            });
        }

        if store.cleanup_interval_secs == 0 || store.cleanup_interval_secs > store.context_ttl_secs
        {
            return Err(ConfigError::InvalidValue {
                field: "store.cleanup_interval_secs".to_string(),
                message: format!(
                    "Must be between 1 and context_ttl_secs ({}), got {}",
                    store.context_ttl_secs, store.cleanup_interval_secs
                ),
            });
        }

        if store.backend == StoreBackend::Redis && store.redis_url.trim().is_empty() {
            return Err(ConfigError::MissingField("store.redis_url".to_string()));
        }

        if self.environment.is_strict() && store.backend == StoreBackend::Memory {
            tracing::warn!(
                environment = ?self.environment,
                "In-memory context store does not share dialogues between instances"
            );
        }

        Ok(())
    }
}

/// Dialogue engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Consecutive invalid answers before abandonment
    #[serde(default = "default_max_retries")]
    pub max_retries: u8,

    /// ISO code applied to a cost with no expressed currency
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_max_retries() -> u8 {
    dialogue::MAX_RETRIES
}

fn default_currency() -> String {
    currency::DEFAULT.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            default_currency: default_currency(),
        }
    }
}

/// Context store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map, single instance only
    #[default]
    Memory,
    /// Shared Redis instance
    Redis,
}

/// Context store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Prepended to every Redis key
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    #[serde(default = "default_context_ttl")]
    pub context_ttl_secs: u64,

    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

fn default_redis_url() -> String {
    store::DEFAULT_REDIS_URL.to_string()
}

fn default_key_prefix() -> String {
    store::DEFAULT_KEY_PREFIX.to_string()
}

fn default_context_ttl() -> u64 {
    store::CONTEXT_TTL_SECS
}

fn default_cleanup_interval() -> u64 {
    store::CLEANUP_INTERVAL_SECS
}

impl StoreConfig {
    pub fn context_ttl(&self) -> Duration {
        Duration::from_secs(self.context_ttl_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            redis_url: default_redis_url(),
            key_prefix: default_key_prefix(),
            context_ttl_secs: default_context_ttl(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level, used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("TRAVEL_CHAT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
