//! Discovery client error types.

use std::fmt;

/// Errors from the places HTTP client.
#[derive(Debug)]
pub enum DiscoveryError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    ApiError { status: u16, message: String },

    /// Rate limited by the API
    RateLimited,

    /// Invalid API key or unauthorized
    Unauthorized,

    /// Query was empty after sanitization; nothing to send upstream
    EmptyQuery,
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::Http(e) => write!(f, "HTTP error: {e}"),
            DiscoveryError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            DiscoveryError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            DiscoveryError::RateLimited => write!(f, "rate limited by places API"),
            DiscoveryError::Unauthorized => write!(f, "unauthorized (invalid API key)"),
            DiscoveryError::EmptyQuery => write!(f, "query empty after sanitization"),
        }
    }
}

impl std::error::Error for DiscoveryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiscoveryError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DiscoveryError {
    fn from(err: reqwest::Error) -> Self {
        DiscoveryError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DiscoveryError::RateLimited;
        assert_eq!(err.to_string(), "rate limited by places API");

        let err = DiscoveryError::ApiError {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "API error 502: Bad Gateway");

        let err = DiscoveryError::Json {
            message: "expected object".into(),
            body: Some("[]".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("expected object"));
    }
}
