//! Environment overrides and default-credential resolution.
//!
//! `WEATHERBUDDY_*` variables win over file values. The default credential
//! also honours the provider's own variable (`GROQ_API_KEY` unless the file
//! names another) so an existing `.env` keeps working.

use crate::error::ConfigError;

use super::{Config, ConfigDiagnostics};

/// Canonical env var for the default credential.
pub(super) const API_KEY_VAR: &str = "WEATHERBUDDY_API_KEY";

pub(super) fn apply_runtime_env_overrides<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
) -> Result<(), ConfigError>
where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(url) = non_blank(env_lookup, "WEATHERBUDDY_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(model) = non_blank(env_lookup, "WEATHERBUDDY_MODEL") {
        config.api.model = model;
    }
    if let Some(url) = non_blank(env_lookup, "WEATHERBUDDY_WEATHER_URL") {
        config.weather.base_url = url;
    }
    if let Some(raw) = non_blank(env_lookup, "WEATHERBUDDY_API_TIMEOUT_SECS") {
        let parsed = raw.trim().parse::<u64>().map_err(|_| {
            ConfigError::Invalid(format!(
                "invalid WEATHERBUDDY_API_TIMEOUT_SECS value `{raw}`: expected positive integer seconds"
            ))
        })?;
        // Zero would mean "fail immediately"; clamp to one second.
        config.api.timeout_secs = Some(parsed.max(1));
    }
    Ok(())
}

/// Resolve the default credential into `config.api.api_key`.
///
/// Order: `WEATHERBUDDY_API_KEY`, then the file's `api_key`, then the env var
/// named by `api_key_env`.
pub(super) fn resolve_default_api_key<FEnv>(
    config: &mut Config,
    env_lookup: &FEnv,
    diagnostics: &mut ConfigDiagnostics,
) where
    FEnv: Fn(&str) -> Option<String>,
{
    if let Some(key) = non_blank(env_lookup, API_KEY_VAR) {
        config.api.api_key = key;
        return;
    }
    let from_file = config.api.api_key.trim().to_string();
    if !from_file.is_empty() {
        config.api.api_key = from_file;
        return;
    }
    let var = config.api.api_key_env.trim().to_string();
    config.api.api_key = if var.is_empty() {
        String::new()
    } else {
        non_blank(env_lookup, &var).unwrap_or_default()
    };
    if config.api.api_key.is_empty() {
        diagnostics.warnings.push(format!(
            "No default API key found (set {API_KEY_VAR} or {}); free queries will fail until one is configured.",
            if var.is_empty() { "api.api_key" } else { var.as_str() }
        ));
    }
}

/// Validate values the loader cannot express through types alone.
pub(super) fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
    }
    if config.api.model.trim().is_empty() {
        return Err(ConfigError::Invalid("api.model must not be empty".into()));
    }
    if config.weather.base_url.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "weather.base_url must not be empty".into(),
        ));
    }
    Ok(())
}

fn non_blank<FEnv>(env_lookup: &FEnv, name: &str) -> Option<String>
where
    FEnv: Fn(&str) -> Option<String>,
{
    env_lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
