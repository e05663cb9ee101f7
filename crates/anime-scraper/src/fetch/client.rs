//! HTML client with browser-like headers, rate limiting, retries and a page cache.

use super::rate_limiter::RateLimiter;
use super::{encode_form, PageFetcher};
use crate::cache::CacheManager;
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL};
use reqwest::{Client, RequestBuilder};
use shared::config::HttpConfig;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Markers of Cloudflare-style interstitials
const CHALLENGE_MARKERS: &[&str] = &[
    "cf-chl-",
    "/cdn-cgi/challenge-platform/",
    "<title>Just a moment...</title>",
    "Attention Required! | Cloudflare",
    "cf_chl_opt",
];

/// Whether a body is a bot-challenge page rather than site content
pub fn looks_like_challenge(body: &str) -> bool {
    CHALLENGE_MARKERS.iter().any(|marker| body.contains(marker))
}

/// Scrape target client
pub struct HtmlClient {
    /// HTTP client
    client: Client,
    /// Shared throttle across all handlers
    rate_limiter: Mutex<RateLimiter>,
    /// Page cache for GET requests
    cache: CacheManager,
    /// Maximum retries for transient failures
    max_retries: u32,
    /// Base delay for retry (exponential backoff)
    retry_delay_ms: u64,
    /// Fail on challenge pages
    detect_challenge: bool,
}

impl HtmlClient {
    /// Create a new client from the `[http]` config section
    pub fn new(config: &HttpConfig, cache: CacheManager) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7"),
        );
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| ScrapeError::Network {
                url: String::new(),
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            rate_limiter: Mutex::new(RateLimiter::new(
                config.rate_limit.requests_per_second,
                config.rate_limit.requests_per_minute,
            )),
            cache,
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
            detect_challenge: config.detect_challenge,
        })
    }

    /// Send a request with rate limiting and retry logic
    async fn send<F>(&self, url: &str, build: F) -> Result<String>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let recent_requests = {
                let mut limiter = self.rate_limiter.lock().await;
                limiter.acquire().await;
                limiter.current_minute_count()
            };

            let started = Instant::now();
            debug!(
                url = %url,
                attempt = attempt + 1,
                requests_last_minute = recent_requests,
                "Fetching page"
            );

            let result = self.send_once(url, &build).await;
            match result {
                Ok(body) => {
                    debug!(
                        url = %url,
                        bytes = body.len(),
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Fetched page"
                    );
                    return Ok(body);
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay =
                        Duration::from_millis(self.retry_delay_ms * 2u64.pow(attempt));
                    warn!(
                        url = %url,
                        error = %e,
                        delay_ms = delay.as_millis() as u64,
                        "Transient failure, retrying"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Request failed");
                    return Err(e);
                }
            }
        }
    }

    async fn send_once<F>(&self, url: &str, build: &F) -> Result<String>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = build(&self.client)
            .send()
            .await
            .map_err(|e| ScrapeError::Network {
                url: url.to_string(),
                message: if e.is_timeout() {
                    "timeout".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ScrapeError::Network {
            url: url.to_string(),
            message: format!("Failed to read body: {}", e),
        })?;

        if self.detect_challenge && looks_like_challenge(&body) {
            return Err(ScrapeError::Challenge {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HtmlClient {
    async fn get(&self, url: &str) -> Result<String> {
        if let Some(body) = self.cache.get(url)? {
            return Ok(body);
        }

        let body = self.send(url, |client| client.get(url)).await?;

        if let Err(e) = self.cache.set(url, &body) {
            warn!(url = %url, error = %e, "Failed to cache page");
        }

        Ok(body)
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        info!(url = %url, "Posting form");
        let encoded = encode_form(form);
        self.send(url, |client| {
            client
                .post(url)
                .header(
                    reqwest::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded; charset=UTF-8",
                )
                .header("X-Requested-With", "XMLHttpRequest")
                .body(encoded.clone())
        })
        .await
    }
}
