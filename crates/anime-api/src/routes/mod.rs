//! Route handlers.

pub mod health;
pub mod index;
pub mod otakudesu;
pub mod samehadaku;

use crate::response::ApiError;
use axum::http::Uri;
use serde::Deserialize;

/// `?page=` query; missing means page 1
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> Result<u32, ApiError> {
        parse_page(self.page.as_deref())
    }
}

/// `?q=&page=` query
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<String>,
}

impl SearchQuery {
    pub fn query(&self) -> Result<&str, ApiError> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ApiError::BadRequest("query parameter `q` is required".to_string()))
    }

    pub fn page(&self) -> Result<u32, ApiError> {
        parse_page(self.page.as_deref())
    }
}

/// Page numbers arrive as text so malformed values still get an envelope
fn parse_page(raw: Option<&str>) -> Result<u32, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(1),
        Some(raw) => match raw.parse::<u32>() {
            Ok(page) if page > 0 => Ok(page),
            _ => Err(ApiError::BadRequest(format!(
                "page must be a positive integer, got {:?}",
                raw
            ))),
        },
    }
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}
