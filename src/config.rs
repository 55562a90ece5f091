use std::env;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::validation::ValidationPolicy;

/// Default values for configuration
const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TOAST_DURATION_MS: u64 = 3_000;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Client configuration, loaded from an optional per-environment file and
/// `APP_`-prefixed environment variables.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Base URL of the product API.
    #[serde(default = "default_base_url")]
    pub api_base_url: String,

    /// Transport-level timeout; the core defines no timeout semantics of
    /// its own.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Visible duration of a transient notification.
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,

    /// Whether a gender must be chosen before a draft can be submitted.
    #[serde(default)]
    pub require_gender: bool,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            request_timeout_secs: default_timeout_secs(),
            toast_duration_ms: default_toast_duration_ms(),
            require_gender: false,
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api_base_url)
            .map_err(|e| ConfigError::Invalid(format!("api_base_url: {}", e)))?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.toast_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "toast_duration_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            require_gender: self.require_gender,
        }
    }
}

/// Load configuration: defaults, then `config/{APP_ENV}.toml` when present,
/// then `APP_`-prefixed environment variables.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let environment = env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());
    debug!(%environment, "loading configuration");

    // APP_ENV selects the profile file; it is not itself a config field and
    // must not reach deserialization.
    let overrides: config::Map<String, String> = env::vars()
        .filter(|(key, _)| key != "APP_ENV")
        .collect();

    let source = Config::builder()
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, environment)).required(false))
        .add_source(Environment::with_prefix("APP").source(Some(overrides)))
        .build()?;

    let cfg: AppConfig = source.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
}

/// Initialize tracing for the binary. `RUST_LOG` wins over the configured
/// level when set.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let default_directive = format!("inventory_client={}", level);
    let directive = env::var("RUST_LOG")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(default_directive);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .init();
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_toast_duration_ms() -> u64 {
    DEFAULT_TOAST_DURATION_MS
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.toast_duration(), Duration::from_secs(3));
        assert!(!cfg.validation_policy().require_gender);
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let cfg = AppConfig {
            api_base_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_timeout() {
        let cfg = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    // Sole test that touches process environment; keep it that way so it
    // cannot race a parallel test run.
    #[test]
    fn profile_selector_is_not_a_config_field() {
        env::set_var("APP_ENV", "production");
        env::set_var("APP_REQUIRE_GENDER", "true");

        let result = load_config();

        env::remove_var("APP_ENV");
        env::remove_var("APP_REQUIRE_GENDER");

        let cfg = result.unwrap();
        assert!(cfg.require_gender);
    }
}
