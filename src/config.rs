//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - config.toml (default configuration)
//! - config.local.toml (git-ignored local overrides)
//! - Environment variables (ERPSIM_* prefix)
//!
//! ## Example
//!
//! ```toml
//! # config.toml
//! [data]
//! master_seed = 7
//! anchor_date = "2025-06-30"
//! window_days = 180
//!
//! [variance]
//! band = 0.05
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! ERPSIM_DATA__MASTER_SEED=11
//! ERPSIM_HTTP__PORT=8080
//! ```

use chrono::{Local, NaiveDate};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::storage::GeneratorSettings;

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub variance: VarianceConfig,
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Synthetic data generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Seed for the one-time row generation
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,

    /// Last day of the trailing window. Unset means today.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_date: Option<NaiveDate>,

    /// Length of the trailing window in days
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

/// Perturbation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarianceConfig {
    /// Relative band, 0.10 = ±10%
    #[serde(default = "default_band")]
    pub band: f64,
}

/// Query simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Cap on raw rows returned by execute
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// HTTP server bind address
    #[serde(default = "default_http_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub port: u16,

    /// Allowed CORS origins (empty = same-origin only, unless cors_allow_all is true)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Explicitly allow all CORS origins (dev mode opt-in)
    #[serde(default)]
    pub cors_allow_all: bool,

    /// Request body limit, applies to schema uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

// Default value functions
fn default_master_seed() -> u64 {
    42
}
fn default_window_days() -> u32 {
    365
}
fn default_band() -> f64 {
    crate::variance::DEFAULT_BAND
}
fn default_max_rows() -> usize {
    crate::query::DEFAULT_MAX_ROWS
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "text".to_string()
}
fn default_http_host() -> String {
    "127.0.0.1".to_string()
}
fn default_http_port() -> u16 {
    crate::protocol::DEFAULT_PORT
}
fn default_max_upload_bytes() -> usize {
    crate::protocol::MAX_UPLOAD_SIZE
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Merges in order:
    /// 1. config.toml (base configuration)
    /// 2. config.local.toml (local overrides, git-ignored)
    /// 3. Environment variables (ERPSIM_* prefix)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Toml::file("config.local.toml"))
            .merge(Env::prefixed("ERPSIM_").split("__"))
            .extract()
    }

    /// Load configuration from specific file path
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("ERPSIM_").split("__"))
            .extract()
    }

    /// Generator inputs, with an unset anchor resolved to today
    pub fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            master_seed: self.data.master_seed,
            anchor: self
                .data
                .anchor_date
                .unwrap_or_else(|| Local::now().date_naive()),
            window_days: self.data.window_days,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            master_seed: default_master_seed(),
            anchor_date: None,
            window_days: default_window_days(),
        }
    }
}

impl Default for VarianceConfig {
    fn default() -> Self {
        VarianceConfig {
            band: default_band(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            max_rows: default_max_rows(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        HttpConfig {
            host: default_http_host(),
            port: default_http_port(),
            cors_origins: Vec::new(),
            cors_allow_all: false,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_config() {
        let config = Config::default();
        assert_eq!(config.data.master_seed, 42);
        assert_eq!(config.data.anchor_date, None);
        assert_eq!(config.data.window_days, 365);
    }

    #[test]
    fn test_default_variance_and_query() {
        let config = Config::default();
        assert!((config.variance.band - 0.10).abs() < f64::EPSILON);
        assert_eq!(config.query.max_rows, 100);
    }

    #[test]
    fn test_default_logging_config() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_default_http_config() {
        let config = Config::default();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 5000);
        assert!(config.http.cors_origins.is_empty());
        assert!(!config.http.cors_allow_all);
        assert_eq!(config.http.max_upload_bytes, 16 * 1024 * 1024);
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string(&Config::default()).unwrap();
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[variance]"));
        assert!(toml_str.contains("[http]"));
        assert!(!toml_str.contains("anchor_date"));
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let mut config = Config::default();
        config.data.anchor_date = NaiveDate::from_ymd_opt(2025, 6, 30);
        let toml_str = toml::to_string(&config).unwrap();
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.data.anchor_date, config.data.anchor_date);
        assert_eq!(back.http.port, 5000);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[query]\nmax_rows = 10\n").unwrap();
        assert_eq!(config.query.max_rows, 10);
        assert_eq!(config.data.master_seed, 42);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_generator_settings_use_anchor() {
        let mut config = Config::default();
        config.data.anchor_date = NaiveDate::from_ymd_opt(2025, 1, 31);
        config.data.window_days = 30;
        let settings = config.generator_settings();
        assert_eq!(settings.anchor, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        assert_eq!(settings.window_start(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_unset_anchor_is_today() {
        let settings = Config::default().generator_settings();
        assert_eq!(settings.anchor, Local::now().date_naive());
    }
}
