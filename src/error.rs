// src/error.rs

//! Unified error handling for the ECO code service.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Result type alias for service operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetching the source document failed
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The source document did not have the expected row structure
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client setup failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A crawl failure shared with every caller that waited on that crawl
    #[error(transparent)]
    Shared(Arc<AppError>),
}

impl AppError {
    /// Create a transport error for the given source URL.
    pub fn transport(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a document parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// The underlying error, looking through [`AppError::Shared`].
    pub fn root(&self) -> &AppError {
        match self {
            Self::Shared(inner) => inner.root(),
            other => other,
        }
    }

    /// Whether this error aborted a crawl (fetch or parse stage).
    pub fn is_crawl_failure(&self) -> bool {
        matches!(
            self.root(),
            Self::Transport { .. } | Self::Parse(_) | Self::Selector { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_names_url() {
        let err = AppError::transport("https://example.com/eco", "connection refused");
        assert_eq!(
            err.to_string(),
            "Transport error for https://example.com/eco: connection refused"
        );
        assert!(err.is_crawl_failure());
    }

    #[test]
    fn config_errors_are_not_crawl_failures() {
        assert!(!AppError::config("missing").is_crawl_failure());
        assert!(AppError::parse("row 3 has no second cell").is_crawl_failure());
    }

    #[test]
    fn shared_error_keeps_kind_and_message() {
        let shared = AppError::Shared(Arc::new(AppError::parse("no rows")));
        assert!(shared.is_crawl_failure());
        assert!(matches!(shared.root(), AppError::Parse(_)));
        assert_eq!(shared.to_string(), "Parse error: no rows");
    }
}
