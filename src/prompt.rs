//! The fixed system prompt sent ahead of every user query.

const SYSTEM_PROMPT: &str = include_str!("templates/system_prompt.txt");

/// Name of the only tool the prompt advertises.
pub const WEATHER_TOOL_NAME: &str = "get_weather";

/// Persona, classification rules, and the four-field JSON output contract.
pub fn system_prompt() -> &'static str {
    SYSTEM_PROMPT
}
