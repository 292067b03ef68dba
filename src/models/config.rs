//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Environment variable overriding `source.url`.
pub const SOURCE_URL_ENV: &str = "ECO_CODE_DATA_URL";

/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "PORT";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Source page and HTTP client settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Dataset cache lifetime
    #[serde(default)]
    pub cache: CacheConfig,

    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply `ECO_CODE_DATA_URL` and `PORT` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(SOURCE_URL_ENV).ok(),
            std::env::var(PORT_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, port: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.source.url = url.trim().to_string();
        }
        if let Some(port) = port {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => log::warn!("Ignoring {PORT_ENV}={port:?}: not a valid port"),
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.source.url)?;
        if !matches!(url.scheme(), "http" | "https" | "file") {
            return Err(AppError::validation(format!(
                "source.url has unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if self.source.user_agent.trim().is_empty() {
            return Err(AppError::validation("source.user_agent is empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if self.source.row_limit == Some(0) {
            return Err(AppError::validation("source.row_limit must be > 0 when set"));
        }
        if self.cache.ttl_secs == 0 {
            return Err(AppError::validation("cache.ttl_secs must be > 0"));
        }
        Ok(())
    }
}

/// Source page and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the ECO reference page (`http(s)://` or `file://`)
    #[serde(default = "defaults::url")]
    pub url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum number of table rows to extract per crawl
    #[serde(default)]
    pub row_limit: Option<usize>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: defaults::url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            row_limit: None,
        }
    }
}

/// Dataset cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds between a successful crawl and invalidation
    #[serde(default = "defaults::ttl")]
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: defaults::ttl(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,

    /// How long to wait for in-flight requests after a shutdown signal
    #[serde(default = "defaults::graceful_timeout")]
    pub graceful_timeout_secs: u64,
}

impl ServerConfig {
    /// Listen address in `host:port` form.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn graceful_timeout(&self) -> Duration {
        Duration::from_secs(self.graceful_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            graceful_timeout_secs: defaults::graceful_timeout(),
        }
    }
}

mod defaults {
    use crate::repository::DEFAULT_CACHE_TTL;

    // Source defaults
    pub fn url() -> String {
        "https://www.chessgames.com/chessecohelp.html".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; eco-codes/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Cache defaults
    pub fn ttl() -> u64 {
        DEFAULT_CACHE_TTL.as_secs()
    }

    // Server defaults
    pub fn host() -> String {
        "0.0.0.0".into()
    }
    pub fn port() -> u16 {
        8080
    }
    pub fn graceful_timeout() -> u64 {
        15
    }
}
