//! Anime scrape API server.

use anime_api::{build_router, AppState};
use anime_scraper::CacheManager;
use anyhow::{Context, Result};
use clap::Parser;
use shared::{Config, LogConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Override the configured listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Clear the page cache before serving
    #[arg(long)]
    clear_cache: bool,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Initialize logging
    shared::logging::init(LogConfig::from_config(&config, "anime-api", args.verbose))?;

    info!("Anime API starting");
    info!(config_file = %args.config.display(), "Loaded configuration");

    // Initialize page cache
    let cache_dir = config.cache_dir();
    let cache = CacheManager::new(
        &cache_dir,
        config.cache.enabled,
        config.cache.expiration_seconds,
    )
    .context("Failed to initialize page cache")?;

    if args.clear_cache {
        info!("Clearing page cache");
        cache.clear().context("Failed to clear page cache")?;
    }

    cache.prune().context("Failed to prune page cache")?;

    let cache_stats = cache.stats().context("Failed to get cache stats")?;
    info!(
        cached_pages = cache_stats.total_files,
        cache_size_mb = cache_stats.total_size_bytes / 1_000_000,
        "Cache statistics"
    );

    // Entries for one-off URLs (searches) are never read again
    if let Some(seconds) = config.cache.expiration_seconds.filter(|_| config.cache.enabled) {
        let pruner = cache.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(seconds.max(60)));
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = pruner.prune() {
                    warn!(error = %e, "Failed to prune page cache");
                }
            }
        });
    }

    let state = AppState::from_config(&config, cache)?;
    let app = build_router(state, &config.server);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!(
        addr = %addr,
        otakudesu = %config.sources.otakudesu.base_url,
        samehadaku = %config.sources.samehadaku.base_url,
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Anime API stopped");

    Ok(())
}
