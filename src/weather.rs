//! Weather lookup against a plain-text weather service (wttr.in by default).
//!
//! Every outcome is a display-ready string: failures are folded into fixed
//! messages instead of being returned as errors.

use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

use crate::api::transport::build_http_client;
use crate::config::WeatherConfig;

/// Returned for any non-200 answer from the weather service.
pub const WEATHER_UNAVAILABLE: &str = "Weather data unavailable";

/// Source of current conditions for a city.
///
/// Tests substitute canned implementations; production uses [`WttrClient`].
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn fetch_weather(&self, city: &str) -> String;
}

/// HTTP client for wttr.in-compatible services.
pub struct WttrClient {
    http: reqwest::Client,
    base_url: String,
    format: String,
}

impl WttrClient {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            http: build_http_client(config.timeout_secs.map(Duration::from_secs)),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            format: config.format.clone(),
        }
    }

    /// `{base}/{city}?format={format}` with the city percent-encoded as one
    /// path segment. The format string goes in verbatim since wttr.in reads
    /// `%C`/`%t`/`+` literally.
    fn lookup_url(&self, city: &str) -> Result<Url, String> {
        let mut url = Url::parse(&self.base_url).map_err(|e| e.to_string())?;
        url.path_segments_mut()
            .map_err(|_| format!("cannot append a path to `{}`", self.base_url))?
            .pop_if_empty()
            .push(city);
        url.set_query(Some(&format!("format={}", self.format)));
        Ok(url)
    }
}

#[async_trait]
impl WeatherLookup for WttrClient {
    async fn fetch_weather(&self, city: &str) -> String {
        let url = match self.lookup_url(city) {
            Ok(url) => url,
            Err(cause) => return format!("Error fetching weather: {cause}"),
        };
        tracing::debug!(%url, "fetching weather");

        let response = match self.http.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(error = %err, city, "weather request failed");
                return format!("Error fetching weather: {err}");
            }
        };
        if response.status() != reqwest::StatusCode::OK {
            tracing::warn!(status = response.status().as_u16(), city, "weather service refused");
            return WEATHER_UNAVAILABLE.to_string();
        }
        match response.text().await {
            Ok(body) => body,
            Err(err) => format!("Error fetching weather: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::{one_shot_http_server, unused_local_addr};

    fn client_for(base_url: String) -> WttrClient {
        WttrClient::new(&WeatherConfig {
            base_url,
            ..WeatherConfig::default()
        })
    }

    #[test]
    fn lookup_url_encodes_city_and_keeps_format_verbatim() {
        let client = client_for("https://wttr.in/".to_string());
        let url = client.lookup_url("New York").unwrap();
        assert_eq!(url.as_str(), "https://wttr.in/New%20York?format=%C+%t");
    }

    #[test]
    fn lookup_url_rejects_unparseable_base() {
        let client = client_for("not a url".to_string());
        assert!(client.lookup_url("Paris").is_err());
    }

    #[tokio::test]
    async fn ok_response_body_is_returned_verbatim() {
        let server = one_shot_http_server("200 OK", "text/plain", "Sunny +20°C").await;
        let client = client_for(server.base_url());
        assert_eq!(client.fetch_weather("Paris").await, "Sunny +20°C");
        let request = server.request().await;
        assert!(
            request.starts_with("GET /Paris?format=%C+%t "),
            "unexpected request line: {request}"
        );
        assert!(!request.to_ascii_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn non_200_yields_unavailable() {
        let server = one_shot_http_server("503 Service Unavailable", "text/plain", "busy").await;
        let client = client_for(server.base_url());
        assert_eq!(client.fetch_weather("Paris").await, WEATHER_UNAVAILABLE);
    }

    #[tokio::test]
    async fn connection_failure_yields_error_string() {
        let client = client_for(format!("http://{}", unused_local_addr().await));
        let text = client.fetch_weather("Paris").await;
        assert!(
            text.starts_with("Error fetching weather: "),
            "unexpected text: {text}"
        );
    }
}
