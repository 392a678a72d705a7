//! Configuration loading from TOML files and environment variables.
//!
//! Precedence (highest wins):
//! 1. Environment variables (`WEATHERBUDDY_BASE_URL`, `WEATHERBUDDY_MODEL`,
//!    `WEATHERBUDDY_WEATHER_URL`, `WEATHERBUDDY_API_TIMEOUT_SECS`).
//! 2. TOML file given via `--config`.
//! 3. `./weatherbuddy.toml` in the current directory.
//! 4. `$XDG_CONFIG_HOME/weatherbuddy/weatherbuddy.toml`
//!    (or `~/.config/weatherbuddy/weatherbuddy.toml`).
//! 5. Built-in defaults.
//!
//! The default provider credential is resolved separately, see
//! [`env`](self::env) for its lookup order.

mod defaults;
mod env;
mod loader;
mod sources;
mod types;

pub use loader::{load_config, load_config_with_diagnostics};
pub use sources::config_root_dir;
pub use types::{
    ApiConfig, Config, ConfigDiagnostics, DisplayConfig, LoadedConfig, QuotaConfig,
    WeatherConfig,
};

#[cfg(test)]
mod tests {
    use super::loader::load_config_from_sources;
    use super::*;
    use crate::error::ConfigError;
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};

    fn files(entries: &[(&str, &str)]) -> impl Fn(&Path) -> Result<String, io::Error> {
        let map: HashMap<PathBuf, String> = entries
            .iter()
            .map(|(p, text)| (PathBuf::from(p), text.to_string()))
            .collect();
        move |path: &Path| {
            map.get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
        }
    }

    fn env(entries: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn no_root() -> Option<PathBuf> {
        None
    }

    #[test]
    fn defaults_apply_without_any_file() {
        let loaded = load_config_from_sources(None, files(&[]), env(&[]), no_root).unwrap();
        let config = loaded.config;
        assert_eq!(config.api.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.api.model, "llama3-70b-8192");
        assert_eq!(config.api.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(config.weather.base_url, "https://wttr.in");
        assert_eq!(config.weather.format, "%C+%t");
        assert_eq!(config.quota.free_queries, 5);
        assert!(config.display.color);
        assert!(config.api.missing_default_key());
        assert_eq!(loaded.diagnostics.warnings.len(), 1);
    }

    #[test]
    fn provider_env_var_supplies_default_key() {
        let loaded = load_config_from_sources(
            None,
            files(&[]),
            env(&[("GROQ_API_KEY", " gsk-default ")]),
            no_root,
        )
        .unwrap();
        assert_eq!(loaded.config.api.api_key, "gsk-default");
        assert!(loaded.diagnostics.warnings.is_empty());
    }

    #[test]
    fn canonical_env_key_beats_file_and_provider_var() {
        let loaded = load_config_from_sources(
            None,
            files(&[("weatherbuddy.toml", "[api]\napi_key = \"from-file\"\n")]),
            env(&[
                ("WEATHERBUDDY_API_KEY", "from-canonical"),
                ("GROQ_API_KEY", "from-provider"),
            ]),
            no_root,
        )
        .unwrap();
        assert_eq!(loaded.config.api.api_key, "from-canonical");
    }

    #[test]
    fn file_key_beats_provider_var() {
        let loaded = load_config_from_sources(
            None,
            files(&[("weatherbuddy.toml", "[api]\napi_key = \"from-file\"\n")]),
            env(&[("GROQ_API_KEY", "from-provider")]),
            no_root,
        )
        .unwrap();
        assert_eq!(loaded.config.api.api_key, "from-file");
    }

    #[test]
    fn custom_api_key_env_is_honoured() {
        let loaded = load_config_from_sources(
            None,
            files(&[(
                "weatherbuddy.toml",
                "[api]\napi_key_env = \"OPENROUTER_API_KEY\"\n",
            )]),
            env(&[("OPENROUTER_API_KEY", "or-key"), ("GROQ_API_KEY", "ignored")]),
            no_root,
        )
        .unwrap();
        assert_eq!(loaded.config.api.api_key, "or-key");
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_config_from_sources(Some("nope.toml"), files(&[]), env(&[]), no_root)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)), "got: {err}");
    }

    #[test]
    fn explicit_path_wins_over_local_file() {
        let loaded = load_config_from_sources(
            Some("custom.toml"),
            files(&[
                ("custom.toml", "[quota]\nfree_queries = 2\n"),
                ("weatherbuddy.toml", "[quota]\nfree_queries = 9\n"),
            ]),
            env(&[]),
            no_root,
        )
        .unwrap();
        assert_eq!(loaded.config.quota.free_queries, 2);
    }

    #[test]
    fn global_file_used_when_no_local_file() {
        let loaded = load_config_from_sources(
            None,
            files(&[(
                "/cfg/weatherbuddy/weatherbuddy.toml",
                "[display]\ncolor = false\n",
            )]),
            env(&[]),
            || Some(PathBuf::from("/cfg")),
        )
        .unwrap();
        assert!(!loaded.config.display.color);
    }

    #[test]
    fn env_overrides_file_values() {
        let loaded = load_config_from_sources(
            None,
            files(&[(
                "weatherbuddy.toml",
                "[api]\nbase_url = \"https://file.example/v1\"\nmodel = \"file-model\"\n",
            )]),
            env(&[
                ("WEATHERBUDDY_BASE_URL", "http://127.0.0.1:9/v1"),
                ("WEATHERBUDDY_MODEL", "env-model"),
                ("WEATHERBUDDY_WEATHER_URL", "http://127.0.0.1:10"),
                ("WEATHERBUDDY_API_TIMEOUT_SECS", "0"),
            ]),
            no_root,
        )
        .unwrap();
        let config = loaded.config;
        assert_eq!(config.api.base_url, "http://127.0.0.1:9/v1");
        assert_eq!(config.api.model, "env-model");
        assert_eq!(config.weather.base_url, "http://127.0.0.1:10");
        assert_eq!(config.api.timeout_secs, Some(1));
    }

    #[test]
    fn invalid_timeout_env_is_rejected() {
        let err = load_config_from_sources(
            None,
            files(&[]),
            env(&[("WEATHERBUDDY_API_TIMEOUT_SECS", "soon")]),
            no_root,
        )
        .unwrap_err();
        assert!(err.to_string().contains("WEATHERBUDDY_API_TIMEOUT_SECS"));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = load_config_from_sources(
            None,
            files(&[("weatherbuddy.toml", "[api\n")]),
            env(&[]),
            no_root,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)), "got: {err}");
    }

    #[test]
    fn blank_model_is_invalid() {
        let err = load_config_from_sources(
            None,
            files(&[("weatherbuddy.toml", "[api]\nmodel = \" \"\n")]),
            env(&[]),
            no_root,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid config: api.model must not be empty");
    }
}
