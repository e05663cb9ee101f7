//! Logging infrastructure for the scrape API.
//!
//! This module provides structured logging with file rotation, contextual fields,
//! and module-specific log levels.

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log directory path
    pub log_dir: String,
    /// Component name (used for log file naming)
    pub component: String,
    /// Default log level
    pub default_level: Level,
    /// Enable console output
    pub console: bool,
    /// Enable file output
    pub file: bool,
    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: "data/logs".to_string(),
            component: "anime-api".to_string(),
            default_level: Level::INFO,
            console: true,
            file: true,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Build a logging configuration from the `[logging]` section.
    ///
    /// `verbose` forces DEBUG regardless of the configured level.
    pub fn from_config(config: &Config, component: &str, verbose: bool) -> Self {
        let default_level = if verbose {
            Level::DEBUG
        } else {
            parse_level(&config.logging.default_level)
        };

        Self {
            log_dir: config.log_dir().to_string_lossy().to_string(),
            component: component.to_string(),
            default_level,
            console: config.logging.console,
            file: config.logging.file,
            json_format: config.logging.json_format,
        }
    }

    /// Filter directives used when RUST_LOG is not set
    fn default_directives(&self) -> String {
        let target = self.component.replace('-', "_");
        format!(
            "{}={},shared={},anime_scraper={},tower_http={},hyper=warn,reqwest=warn,h2=warn,html5ever=error",
            target, self.default_level, self.default_level, self.default_level, self.default_level
        )
    }
}

/// Parse a level name, falling back to INFO for anything unrecognised
pub fn parse_level(level: &str) -> Level {
    level.trim().parse::<Level>().unwrap_or(Level::INFO)
}

/// Initialize logging with the given configuration
///
/// Sets up tracing with:
/// - Daily file rotation
/// - Structured logging with contextual fields
/// - Module-specific log levels
/// - Optional JSON formatting
pub fn init(config: LogConfig) -> Result<()> {
    let log_dir = Path::new(&config.log_dir);
    if config.file {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", config.log_dir))?;
    }

    // Default to configured level, but allow override via RUST_LOG
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

    let mut layers = Vec::new();

    // Console layer (human-readable)
    if config.console {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stdout)
            .boxed();
        layers.push(console_layer);
    }

    // File layer with rotation
    if config.file {
        let file_appender = tracing_appender::rolling::daily(log_dir, &config.component);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(file_appender)
                .boxed()
        } else {
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(file_appender)
                .boxed()
        };

        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::info!(
        component = %config.component,
        log_dir = %config.log_dir,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config() {
        let config = LogConfig::default();
        assert_eq!(config.component, "anime-api");
        assert_eq!(config.default_level, Level::INFO);
        assert!(config.console);
        assert!(config.file);
    }

    #[test]
    fn test_from_config_respects_verbose() {
        let mut config = Config::default();
        config.logging.default_level = "warn".to_string();

        let quiet = LogConfig::from_config(&config, "anime-api", false);
        assert_eq!(quiet.default_level, Level::WARN);

        let verbose = LogConfig::from_config(&config, "anime-api", true);
        assert_eq!(verbose.default_level, Level::DEBUG);
        assert!(verbose.log_dir.ends_with("logs"));
    }

    #[test]
    fn test_parse_level_fallback() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" ERROR "), Level::ERROR);
        assert_eq!(parse_level("loud"), Level::INFO);
    }

    #[test]
    fn test_default_directives_use_crate_target() {
        let config = LogConfig::default();
        let directives = config.default_directives();
        assert!(directives.starts_with("anime_api=INFO"));
        assert!(directives.contains("anime_scraper=INFO"));
    }
}
