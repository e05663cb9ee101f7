//! Shared handler state.

use anime_scraper::{CacheManager, HtmlClient, Otakudesu, PageFetcher, Samehadaku};
use anyhow::{Context, Result};
use shared::config::SourcesConfig;
use shared::Config;
use std::sync::Arc;
use std::time::Instant;

/// Per-source scrapers plus process metadata, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub otakudesu: Arc<Otakudesu>,
    pub samehadaku: Arc<Samehadaku>,
    pub started_at: Instant,
}

impl AppState {
    /// Both sources share one fetcher so rate limiting and the page cache
    /// apply across the whole process
    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>, sources: &SourcesConfig) -> Self {
        Self {
            otakudesu: Arc::new(Otakudesu::new(
                Arc::clone(&fetcher),
                sources.otakudesu.clone(),
            )),
            samehadaku: Arc::new(Samehadaku::new(fetcher, sources.samehadaku.clone())),
            started_at: Instant::now(),
        }
    }

    /// Build the live HTTP fetcher from configuration
    pub fn from_config(config: &Config, cache: CacheManager) -> Result<Self> {
        let client = HtmlClient::new(&config.http, cache).context("Failed to create HTTP client")?;
        Ok(Self::with_fetcher(Arc::new(client), &config.sources))
    }
}
