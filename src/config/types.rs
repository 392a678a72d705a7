//! Configuration data model.
//!
//! Every section deserializes with `#[serde(default)]`, so an empty file (or
//! no file at all) yields the built-in defaults.

use serde::Deserialize;

use super::defaults::{
    DEFAULT_API_BASE_URL, DEFAULT_API_KEY_ENV, DEFAULT_FREE_QUERIES, DEFAULT_MODEL_ID,
    DEFAULT_WEATHER_BASE_URL, DEFAULT_WEATHER_FORMAT,
};

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub weather: WeatherConfig,
    pub quota: QuotaConfig,
    pub display: DisplayConfig,
}

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub model: String,
    /// Default credential used when the caller brings none. After loading this
    /// holds the resolved value, whatever source it came from.
    pub api_key: String,
    /// Env var consulted for the default credential when `api_key` is empty.
    pub api_key_env: String,
    /// Request timeout. `None` keeps the HTTP client's own defaults.
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.into(),
            model: DEFAULT_MODEL_ID.into(),
            api_key: String::new(),
            api_key_env: DEFAULT_API_KEY_ENV.into(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    /// True when no default credential could be resolved.
    pub fn missing_default_key(&self) -> bool {
        self.api_key.trim().is_empty()
    }
}

/// Weather lookup service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    /// Value of the `format` query parameter.
    pub format: String,
    pub timeout_secs: Option<u64>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WEATHER_BASE_URL.into(),
            format: DEFAULT_WEATHER_FORMAT.into(),
            timeout_secs: None,
        }
    }
}

/// Free-tier quota settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuotaConfig {
    pub free_queries: u32,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            free_queries: DEFAULT_FREE_QUERIES,
        }
    }
}

/// Display / rendering preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Non-fatal findings collected while loading configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigDiagnostics {
    pub warnings: Vec<String>,
}

/// Configuration payload plus load-time diagnostics.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub diagnostics: ConfigDiagnostics,
}
