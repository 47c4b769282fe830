//! Places API HTTP client.
//!
//! Queries a geocoding/places service for cities near a point. The
//! upstream API takes a free-text query plus a center/radius filter
//! and returns place results with nested address and position fields.

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;

use super::error::DiscoveryError;

/// Default base URL for the places API.
const DEFAULT_BASE_URL: &str = "https://discover.search.hereapi.com/v1";

/// Miles to meters, for the upstream radius parameter.
const METERS_PER_MILE: f64 = 1609.344;

/// One place result from the API.
///
/// Only the fields the engine needs; everything else is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceItem {
    #[serde(default)]
    pub address: PlaceAddress,
    #[serde(default)]
    pub position: Option<PlacePosition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceAddress {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state_code: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PlacePosition {
    pub lat: f64,
    pub lng: f64,
}

/// Wrapper for the places response.
#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    items: Vec<PlaceItem>,
}

/// Configuration for the places client.
#[derive(Debug, Clone)]
pub struct PlacesConfig {
    /// API key for x-apikey header authentication
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PlacesConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 8,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Sanitize free-text query input before sending it upstream.
///
/// Legacy callers pass through literal "null"/"undefined" tokens and
/// stray punctuation from form fields; the upstream API responds to
/// those with junk results or 400s. Keep alphanumeric tokens only and
/// collapse whitespace.
pub fn sanitize_query(raw: &str) -> String {
    raw.split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
        .filter(|token| {
            let lower = token.to_lowercase();
            lower != "null" && lower != "undefined" && lower != "nan"
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Client for the places API.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    base_url: String,
}

impl PlacesClient {
    /// Create a new places client.
    pub fn new(config: PlacesConfig) -> Result<Self, DiscoveryError> {
        let mut headers = HeaderMap::new();

        let api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| DiscoveryError::ApiError {
                status: 0,
                message: "Invalid API key format".to_string(),
            })?;
        headers.insert("x-apikey", api_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Search for cities near a point.
    ///
    /// The query text is sanitized before sending; an empty sanitized
    /// query returns `EmptyQuery` rather than hitting the API.
    pub async fn search(
        &self,
        query: &str,
        lat: f64,
        lon: f64,
        radius_miles: f64,
        limit: usize,
    ) -> Result<Vec<PlaceItem>, DiscoveryError> {
        let q = sanitize_query(query);
        if q.is_empty() {
            return Err(DiscoveryError::EmptyQuery);
        }

        let radius_m = (radius_miles * METERS_PER_MILE).round() as u64;
        let url = format!("{}/discover", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", q),
                ("in", format!("circle:{lat},{lon};r={radius_m}")),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(DiscoveryError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DiscoveryError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DiscoveryError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: PlacesResponse =
            serde_json::from_str(&body).map_err(|e| DiscoveryError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(parsed.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = PlacesConfig::new("test-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 8);
    }

    #[test]
    fn config_with_base_url() {
        let config = PlacesConfig::new("test-key").with_base_url("http://localhost:9090");
        assert_eq!(config.base_url, "http://localhost:9090");
    }

    #[test]
    fn sanitize_strips_null_tokens() {
        assert_eq!(sanitize_query("Chicago null IL"), "Chicago IL");
        assert_eq!(sanitize_query("undefined undefined"), "");
        assert_eq!(sanitize_query("NULL Aurora"), "Aurora");
    }

    #[test]
    fn sanitize_strips_punctuation() {
        assert_eq!(sanitize_query("St. Louis, MO"), "St Louis MO");
        assert_eq!(sanitize_query("  Winston--Salem   NC "), "WinstonSalem NC");
    }

    #[test]
    fn sanitize_empty_input() {
        assert_eq!(sanitize_query(""), "");
        assert_eq!(sanitize_query("   ,,, ..."), "");
    }
}
