//! Error type shared by the fetcher and every extractor.

use thiserror::Error;

/// Errors that can occur while fetching or extracting a page
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Connection failure, timeout, DNS error
    #[error("Failed to reach {url}: {message}")]
    Network { url: String, message: String },

    /// Upstream answered with a non-success status
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    /// A bot-challenge interstitial was served instead of content
    #[error("Bot challenge served by {url}")]
    Challenge { url: String },

    /// The page exists but does not hold the expected content
    #[error("Not found: {0}")]
    NotFound(String),

    /// Markup or payload could not be interpreted
    #[error("Failed to parse {what}: {message}")]
    Parse { what: String, message: String },

    /// Caller supplied an unusable parameter (page number, server id)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Page cache read/write failure
    #[error("Cache error: {0}")]
    Cache(String),
}

impl ScrapeError {
    pub fn parse(what: impl Into<String>, message: impl ToString) -> Self {
        ScrapeError::Parse {
            what: what.into(),
            message: message.to_string(),
        }
    }

    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            ScrapeError::Network { .. } => true,
            ScrapeError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let network = ScrapeError::Network {
            url: "https://a".to_string(),
            message: "timeout".to_string(),
        };
        assert!(network.is_transient());

        let throttled = ScrapeError::Status {
            url: "https://a".to_string(),
            status: 429,
        };
        assert!(throttled.is_transient());

        let missing = ScrapeError::Status {
            url: "https://a".to_string(),
            status: 404,
        };
        assert!(!missing.is_transient());

        let challenge = ScrapeError::Challenge {
            url: "https://a".to_string(),
        };
        assert!(!challenge.is_transient());
    }

    #[test]
    fn test_display() {
        let err = ScrapeError::Status {
            url: "https://a/x".to_string(),
            status: 502,
        };
        assert_eq!(err.to_string(), "https://a/x returned status 502");
    }
}
