//! In-memory [`PageFetcher`] backed by a URL → body map.

use super::{encode_form, PageFetcher};
use crate::error::{Result, ScrapeError};
use async_trait::async_trait;
use std::collections::HashMap;

/// Serves registered bodies; anything else is a 404
#[derive(Debug, Clone, Default)]
pub struct StaticPages {
    pages: HashMap<String, String>,
}

impl StaticPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the body returned for a GET of `url`
    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    /// Register the body returned for a form POST to `url`
    pub fn with_form(
        mut self,
        url: &str,
        form: &[(&str, &str)],
        body: impl Into<String>,
    ) -> Self {
        self.pages.insert(Self::form_key(url, form), body.into());
        self
    }

    fn form_key(url: &str, form: &[(&str, &str)]) -> String {
        format!("POST {} {}", url, encode_form(form))
    }

    fn lookup(&self, key: &str, url: &str) -> Result<String> {
        self.pages
            .get(key)
            .cloned()
            .ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

#[async_trait]
impl PageFetcher for StaticPages {
    async fn get(&self, url: &str) -> Result<String> {
        self.lookup(url, url)
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<String> {
        self.lookup(&Self::form_key(url, form), url)
    }
}
