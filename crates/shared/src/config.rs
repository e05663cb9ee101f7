//! Configuration management for the anime scrape API.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Outgoing HTTP (fetcher) settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Page cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Scrape target settings
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// `max-age` advertised in the Cache-Control header of successful responses
    pub cache_max_age_seconds: u64,
}

/// Outgoing request configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// User agent sent to scrape targets
    pub user_agent: String,

    /// Maximum retries for transient failures
    pub max_retries: u32,

    /// Base retry delay in milliseconds (doubled per attempt)
    pub retry_delay_ms: u64,

    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,

    /// Fail fast when a bot-challenge page is served instead of content
    pub detect_challenge: bool,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per second
    pub requests_per_second: f64,

    /// Maximum requests per minute
    pub requests_per_minute: u32,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable caching
    pub enabled: bool,

    /// Cache directory (relative to data directory)
    pub cache_dir: String,

    /// Cache expiration in seconds (None = permanent)
    pub expiration_seconds: Option<u64>,
}

/// Scrape target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub otakudesu: OtakudesuConfig,
    pub samehadaku: SamehadakuConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtakudesuConfig {
    /// Site root, without trailing slash
    pub base_url: String,

    /// admin-ajax action that issues a nonce
    pub nonce_action: String,

    /// admin-ajax action that returns the embed player for a mirror
    pub embed_action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamehadakuConfig {
    /// Site root, without trailing slash
    pub base_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            cors_origins: Vec::new(),
            cache_max_age_seconds: 300,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            max_retries: 2,
            retry_delay_ms: 500,
            rate_limit: RateLimitConfig {
                requests_per_second: 4.0,
                requests_per_minute: 120,
            },
            detect_challenge: true,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: "cache".to_string(),
            expiration_seconds: Some(600),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            otakudesu: OtakudesuConfig {
                base_url: "https://otakudesu.cloud".to_string(),
                nonce_action: "aa1208d27f29ca340c92c66d1926f13f".to_string(),
                embed_action: "2a3505c93b0035d3f455df82bf976b84".to_string(),
            },
            samehadaku: SamehadakuConfig {
                base_url: "https://v1.samehadaku.how".to_string(),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            server: ServerConfig::default(),
            http: HttpConfig::default(),
            cache: CacheConfig::default(),
            sources: SourcesConfig::default(),
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Get the path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    /// Get the absolute path for the page cache directory
    pub fn cache_dir(&self) -> PathBuf {
        self.resolve(&self.cache.cache_dir)
    }

    /// Socket address string for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}
