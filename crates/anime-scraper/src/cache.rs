//! Page cache for fetched HTML.
//!
//! Stores upstream response bodies on disk keyed by request, so repeated API
//! calls inside the expiration window do not hit the scrape target again.

use crate::error::{Result, ScrapeError};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Cached page as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedPage {
    key: String,
    fetched_at: DateTime<Utc>,
    body: String,
}

/// Cache manager for fetched pages
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Root cache directory
    cache_dir: PathBuf,
    /// Whether caching is enabled
    enabled: bool,
    /// Entry lifetime (None = permanent)
    expiration: Option<Duration>,
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(
        cache_dir: impl AsRef<Path>,
        enabled: bool,
        expiration_seconds: Option<u64>,
    ) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        if enabled {
            std::fs::create_dir_all(&cache_dir).map_err(|e| {
                ScrapeError::Cache(format!(
                    "Failed to create cache directory {}: {}",
                    cache_dir.display(),
                    e
                ))
            })?;
            info!(cache_dir = %cache_dir.display(), "Page cache initialized");
        }

        let expiration = expiration_seconds.map(|secs| Duration::seconds(secs as i64));

        Ok(Self {
            cache_dir,
            enabled,
            expiration,
        })
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self {
            cache_dir: PathBuf::new(),
            enabled: false,
            expiration: None,
        }
    }

    /// Get a cached page body if present and not expired
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        if !self.enabled {
            return Ok(None);
        }

        let path = self.cache_path(key);
        if !path.exists() {
            debug!(key = key, "Cache miss");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| {
            ScrapeError::Cache(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let page: CachedPage = match serde_json::from_str(&content) {
            Ok(page) => page,
            Err(e) => {
                // A torn write is not fatal, refetch instead
                debug!(key = key, error = %e, "Discarding unreadable cache entry");
                let _ = std::fs::remove_file(&path);
                return Ok(None);
            }
        };

        if page.key != key {
            debug!(key = key, "Cache entry belongs to another key");
            return Ok(None);
        }

        if self.is_expired(&page, Utc::now()) {
            debug!(key = key, "Removing stale cache entry");
            let _ = std::fs::remove_file(&path);
            return Ok(None);
        }

        debug!(key = key, "Cache hit");
        Ok(Some(page.body))
    }

    /// Store a page body in the cache
    pub fn set(&self, key: &str, body: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.cache_path(key);
        let page = CachedPage {
            key: key.to_string(),
            fetched_at: Utc::now(),
            body: body.to_string(),
        };

        let content = serde_json::to_string(&page)
            .map_err(|e| ScrapeError::Cache(format!("Failed to serialize page: {}", e)))?;

        std::fs::write(&path, content).map_err(|e| {
            ScrapeError::Cache(format!("Failed to write {}: {}", path.display(), e))
        })?;

        debug!(key = key, path = %path.display(), "Cache stored");
        Ok(())
    }

    fn is_expired(&self, page: &CachedPage, now: DateTime<Utc>) -> bool {
        match self.expiration {
            Some(ttl) => now - page.fetched_at > ttl,
            None => false,
        }
    }

    /// Get the cache file path for a given key
    fn cache_path(&self, key: &str) -> PathBuf {
        let mut safe_key: String = key
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        safe_key.truncate(180);

        self.cache_dir.join(format!("{}.json", safe_key))
    }

    /// Clear all cached pages
    pub fn clear(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.cache_dir.exists() {
            std::fs::remove_dir_all(&self.cache_dir)
                .and_then(|_| std::fs::create_dir_all(&self.cache_dir))
                .map_err(|e| {
                    ScrapeError::Cache(format!(
                        "Failed to reset cache directory {}: {}",
                        self.cache_dir.display(),
                        e
                    ))
                })?;
            info!("Page cache cleared");
        }

        Ok(())
    }

    /// Delete expired and unreadable entries, returning how many were removed
    pub fn prune(&self) -> Result<usize> {
        if !self.enabled || self.expiration.is_none() || !self.cache_dir.exists() {
            return Ok(0);
        }

        let now = Utc::now();
        let mut removed = 0;
        let entries = std::fs::read_dir(&self.cache_dir)
            .map_err(|e| ScrapeError::Cache(e.to_string()))?;

        for entry in entries {
            let path = entry.map_err(|e| ScrapeError::Cache(e.to_string()))?.path();
            if !path.is_file() {
                continue;
            }

            let expired = std::fs::read_to_string(&path)
                .ok()
                .and_then(|content| serde_json::from_str::<CachedPage>(&content).ok())
                .map_or(true, |page| self.is_expired(&page, now));

            if expired && std::fs::remove_file(&path).is_ok() {
                removed += 1;
            }
        }

        if removed > 0 {
            info!(removed = removed, "Pruned stale cache entries");
        }
        Ok(removed)
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        if !self.enabled || !self.cache_dir.exists() {
            return Ok(CacheStats::default());
        }

        let mut stats = CacheStats::default();
        let entries = std::fs::read_dir(&self.cache_dir)
            .map_err(|e| ScrapeError::Cache(e.to_string()))?;

        for entry in entries {
            let entry = entry.map_err(|e| ScrapeError::Cache(e.to_string()))?;
            if entry.path().is_file() {
                stats.total_files += 1;
                stats.total_size_bytes += entry
                    .metadata()
                    .map_err(|e| ScrapeError::Cache(e.to_string()))?
                    .len();
            }
        }

        Ok(stats)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub total_files: usize,
    pub total_size_bytes: u64,
}
