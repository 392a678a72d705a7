//! Config-file source discovery.
//!
//! Precedence: explicit path > `./weatherbuddy.toml` > global file > defaults.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::defaults::CONFIG_FILE_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum ConfigSource {
    /// `--config <path>`.
    Explicit(PathBuf),
    /// `./weatherbuddy.toml`.
    Local,
    /// `<config root>/weatherbuddy/weatherbuddy.toml`.
    Global(PathBuf),
    BuiltInDefaults,
}

/// Read config text from the highest-precedence available source.
pub(super) fn read_config_text_with_sources<FRead, FRoot>(
    path_override: Option<&str>,
    read_file: &FRead,
    config_root: &FRoot,
) -> Result<(String, ConfigSource), ConfigError>
where
    FRead: Fn(&Path) -> Result<String, std::io::Error>,
    FRoot: Fn() -> Option<PathBuf>,
{
    // An explicit path must exist; silently falling back would hide typos.
    if let Some(p) = path_override {
        let path = PathBuf::from(p);
        let text = read_file(&path)?;
        return Ok((text, ConfigSource::Explicit(path)));
    }

    if let Ok(text) = read_file(Path::new(CONFIG_FILE_NAME)) {
        return Ok((text, ConfigSource::Local));
    }

    if let Some(global) = global_config_path_in(config_root()) {
        if let Ok(text) = read_file(&global) {
            return Ok((text, ConfigSource::Global(global)));
        }
    }

    Ok((String::new(), ConfigSource::BuiltInDefaults))
}

/// Per-user config path under the given root.
pub(super) fn global_config_path_in(root: Option<PathBuf>) -> Option<PathBuf> {
    root.map(|dir| dir.join("weatherbuddy").join(CONFIG_FILE_NAME))
}

/// `$XDG_CONFIG_HOME`, else `~/.config`, else the platform config dir.
pub fn config_root_dir() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".config"))
        .or_else(dirs::config_dir)
}
