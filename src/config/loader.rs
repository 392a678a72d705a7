//! Top-level config loading pipeline.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::env::{apply_runtime_env_overrides, resolve_default_api_key, validate};
use super::sources::{config_root_dir, read_config_text_with_sources};
use super::{Config, ConfigDiagnostics, LoadedConfig};

/// Load configuration from disk and environment.
///
/// `path_override` is an explicit config file path (from --config flag).
pub fn load_config(path_override: Option<&str>) -> Result<Config, ConfigError> {
    Ok(load_config_with_diagnostics(path_override)?.config)
}

/// Load configuration and return non-fatal diagnostics alongside it.
pub fn load_config_with_diagnostics(
    path_override: Option<&str>,
) -> Result<LoadedConfig, ConfigError> {
    load_config_from_sources(
        path_override,
        |path| std::fs::read_to_string(path),
        |name| std::env::var(name).ok(),
        config_root_dir,
    )
}

pub(super) fn load_config_from_sources<FRead, FEnv, FRoot>(
    path_override: Option<&str>,
    read_file: FRead,
    env_lookup: FEnv,
    config_root: FRoot,
) -> Result<LoadedConfig, ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FEnv: Fn(&str) -> Option<String>,
    FRoot: Fn() -> Option<PathBuf>,
{
    let (config_text, source) =
        read_config_text_with_sources(path_override, &read_file, &config_root)?;
    tracing::debug!(?source, "resolved config source");

    let mut config: Config = toml::from_str(&config_text)?;
    let mut diagnostics = ConfigDiagnostics::default();
    apply_runtime_env_overrides(&mut config, &env_lookup)?;
    resolve_default_api_key(&mut config, &env_lookup, &mut diagnostics);
    validate(&config)?;

    Ok(LoadedConfig {
        config,
        diagnostics,
    })
}
