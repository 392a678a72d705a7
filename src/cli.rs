//! CLI argument parsing via clap.

use clap::Parser;

/// A weather assistant for the terminal, backed by an OpenAI-compatible API.
#[derive(Debug, Parser)]
#[command(
    name = "weatherbuddy",
    version,
    long_version = weatherbuddy::build_info::LONG_VERSION
)]
pub struct Args {
    /// Question to ask. If provided, runs in one-shot mode and exits.
    pub prompt: Option<String>,

    /// Path to config file (default: ./weatherbuddy.toml or
    /// ~/.config/weatherbuddy/weatherbuddy.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Use your own provider key for unlimited queries.
    #[arg(long = "api-key", value_name = "KEY")]
    pub api_key: Option<String>,

    /// Override model name.
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Override API base URL.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Print the raw result object as JSON instead of formatted text.
    #[arg(long = "json")]
    pub json: bool,

    /// Queries already used by this caller.
    #[arg(long = "usage-count", value_name = "N", default_value_t = 0)]
    pub usage_count: u32,
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn bare_invocation_is_interactive() {
        let args = Args::parse_from(["weatherbuddy"]);
        assert!(args.prompt.is_none());
        assert_eq!(args.usage_count, 0);
        assert!(!args.json);
    }

    #[test]
    fn one_shot_with_key_and_json() {
        let args = Args::parse_from([
            "weatherbuddy",
            "--api-key",
            "gsk_test",
            "--json",
            "weather in Paris?",
        ]);
        assert_eq!(args.prompt.as_deref(), Some("weather in Paris?"));
        assert_eq!(args.api_key.as_deref(), Some("gsk_test"));
        assert!(args.json);
    }

    #[test]
    fn usage_count_rejects_negative_values() {
        assert!(Args::try_parse_from(["weatherbuddy", "--usage-count", "-1"]).is_err());
        let args = Args::parse_from(["weatherbuddy", "--usage-count", "4"]);
        assert_eq!(args.usage_count, 4);
    }

    #[test]
    fn overrides_parse() {
        let args = Args::parse_from([
            "weatherbuddy",
            "-c",
            "/tmp/wb.toml",
            "-m",
            "llama3-8b-8192",
            "--base-url",
            "http://localhost:9000/v1",
            "--no-color",
        ]);
        assert_eq!(args.config.as_deref(), Some("/tmp/wb.toml"));
        assert_eq!(args.model.as_deref(), Some("llama3-8b-8192"));
        assert_eq!(args.base_url.as_deref(), Some("http://localhost:9000/v1"));
        assert!(args.no_color);
    }
}
