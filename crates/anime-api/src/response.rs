//! Response envelope and error mapping.
//!
//! Every route answers with the same JSON shape:
//! `{ status, message, ok, data, pagination }`.

use anime_scraper::ScrapeError;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shared::{Paged, Pagination};
use tracing::{error, warn};

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: String,
    pub ok: bool,
    pub data: Option<T>,
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            message: "OK".to_string(),
            ok: true,
            data: Some(data),
            pagination: None,
        }
    }
}

impl<T: Serialize> Envelope<Vec<T>> {
    /// Listing page with its pagination block
    pub fn paged(page: Paged<T>) -> Self {
        Self {
            pagination: Some(page.pagination),
            ..Self::ok(page.items)
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Handler result
pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

/// Error returned by handlers, rendered as an envelope with `ok: false`
#[derive(Debug)]
pub enum ApiError {
    Scrape(ScrapeError),
    /// No route matched
    RouteNotFound(String),
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Scrape(err) => match err {
                ScrapeError::NotFound(_) => StatusCode::NOT_FOUND,
                ScrapeError::Status { status: 404, .. } => StatusCode::NOT_FOUND,
                ScrapeError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                ScrapeError::Challenge { .. } => StatusCode::SERVICE_UNAVAILABLE,
                ScrapeError::Status { .. } | ScrapeError::Network { .. } => StatusCode::BAD_GATEWAY,
                ScrapeError::Parse { .. } | ScrapeError::Cache(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Scrape(err) => err.to_string(),
            ApiError::RouteNotFound(path) => format!("No route for {}", path),
            ApiError::BadRequest(message) => message.clone(),
        }
    }
}

impl From<ScrapeError> for ApiError {
    fn from(err: ScrapeError) -> Self {
        ApiError::Scrape(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %message, "Request rejected");
        }

        let envelope: Envelope<()> = Envelope {
            status: status.as_u16(),
            message,
            ok: false,
            data: None,
            pagination: None,
        };

        let mut response = envelope.into_response();
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }
}
