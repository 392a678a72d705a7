//! Best-effort recovery of a weather answer from a failed JSON generation.
//!
//! When JSON mode fails, the model often wrote something like
//! `"content": "Brrr, Oslo is " + str(get_weather("Oslo"))`. The call is
//! replaced with a real lookup so the user still gets an answer.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

use crate::weather::WeatherLookup;

/// `"content": "<json string>"`, escape-aware.
static CONTENT_FIELD: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r#""content"\s*:\s*"((?:[^"\\]|\\.)*)""#));

/// `str(get_weather("City"))` or `get_weather("City")`, quotes optionally
/// escaped. Group 1 or 2 holds the city.
static WEATHER_CALL: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r#"str\(\s*get_weather\(\s*\\?["']([^"'\\]+)\\?["']\s*\)\s*\)|get_weather\(\s*\\?["']([^"'\\]+)\\?["']\s*\)"#,
    )
});

/// A recoverable failed generation: the text to show and where the weather
/// goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryPlan {
    pub content: String,
    pub city: String,
    /// Byte range of the call inside `content`; `None` when the call only
    /// appeared elsewhere in the payload and the weather is appended.
    pub call_span: Option<Range<usize>>,
}

impl RecoveryPlan {
    /// Substitute the lookup result into the recovered text.
    pub fn apply(&self, weather: &str) -> String {
        match &self.call_span {
            Some(span) => {
                let mut text = self.content.clone();
                text.replace_range(span.clone(), weather.trim());
                text
            }
            None => format!("{} {}", self.content.trim_end(), weather.trim())
                .trim()
                .to_string(),
        }
    }
}

/// Find the recovered content and the city the model wanted weather for.
pub fn plan_recovery(failed_generation: &str) -> Option<RecoveryPlan> {
    let content_field = compiled(&CONTENT_FIELD)?;
    let weather_call = compiled(&WEATHER_CALL)?;

    let raw_content = content_field.captures(failed_generation)?.get(1)?.as_str();
    let content = unescape_json_string(raw_content);

    if let Some((city, span)) = find_weather_call(weather_call, &content) {
        return Some(RecoveryPlan {
            content,
            city,
            call_span: Some(span),
        });
    }
    let (city, _) = find_weather_call(weather_call, failed_generation)?;
    Some(RecoveryPlan {
        content,
        city,
        call_span: None,
    })
}

/// Plan, look up the weather, and build the recovered text.
pub async fn recover_weather_content(
    failed_generation: &str,
    weather: &dyn WeatherLookup,
) -> Option<String> {
    let plan = plan_recovery(failed_generation)?;
    tracing::info!(city = %plan.city, "recovering weather answer from failed generation");
    let report = weather.fetch_weather(&plan.city).await;
    Some(plan.apply(&report))
}

fn find_weather_call(regex: &Regex, text: &str) -> Option<(String, Range<usize>)> {
    let caps = regex.captures(text)?;
    let whole = caps.get(0)?;
    let city = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();
    if city.is_empty() {
        return None;
    }
    Some((city.to_string(), whole.range()))
}

/// Decode JSON escapes; text that is not a valid JSON string body is kept.
fn unescape_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}

fn compiled(pattern: &'static LazyLock<Result<Regex, regex::Error>>) -> Option<&'static Regex> {
    match LazyLock::force(pattern) {
        Ok(regex) => Some(regex),
        Err(err) => {
            tracing::error!(error = %err, "recovery pattern failed to compile");
            None
        }
    }
}
