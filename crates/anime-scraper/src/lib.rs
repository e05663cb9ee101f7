//! HTML fetching and extraction for the supported anime sites.
//!
//! Parsers are plain functions over a page body; the per-site clients in
//! [`sources`] pair them with a [`fetch::PageFetcher`].

pub mod cache;
pub mod dom;
pub mod error;
pub mod fetch;
pub mod pagination;
pub mod slug;
pub mod sources;

pub use cache::{CacheManager, CacheStats};
pub use error::{Result, ScrapeError};
pub use fetch::{HtmlClient, PageFetcher, StaticPages};
pub use sources::{Otakudesu, Samehadaku};
