//! Page fetching.
//!
//! Extractors never talk to the network directly: they ask a [`PageFetcher`]
//! for a page body. [`HtmlClient`] is the real implementation, [`StaticPages`]
//! serves canned bodies for tests and offline replays.

pub mod client;
pub mod rate_limiter;
pub mod static_pages;

pub use client::{looks_like_challenge, HtmlClient};
pub use rate_limiter::RateLimiter;
pub use static_pages::StaticPages;

use crate::error::Result;
use async_trait::async_trait;

/// Source of raw page bodies
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET a page and return its body
    async fn get(&self, url: &str) -> Result<String>;

    /// POST an urlencoded form and return the response body
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String>;
}

/// Encode form pairs the way they go over the wire
pub fn encode_form(form: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form.iter())
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_form() {
        let encoded = encode_form(&[("action", "abc"), ("q", "360p hd")]);
        assert_eq!(encoded, "action=abc&q=360p+hd");
    }
}
