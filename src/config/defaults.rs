//! Default configuration constants.

/// Groq's OpenAI-compatible endpoint.
pub(super) const DEFAULT_API_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Hosted model the system prompt was tuned against.
pub(super) const DEFAULT_MODEL_ID: &str = "llama3-70b-8192";
/// Env var holding the process-wide default credential when the config file
/// does not name another one.
pub(super) const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";
/// Plain-text weather service.
pub(super) const DEFAULT_WEATHER_BASE_URL: &str = "https://wttr.in";
/// wttr.in format string: condition followed by temperature.
pub(super) const DEFAULT_WEATHER_FORMAT: &str = "%C+%t";
/// Queries allowed without a caller-supplied credential.
pub(super) const DEFAULT_FREE_QUERIES: u32 = 5;
/// File name searched in the working directory and the config root.
pub(super) const CONFIG_FILE_NAME: &str = "weatherbuddy.toml";
