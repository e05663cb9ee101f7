//! HTTP layer of the anime scrape API.
//!
//! The binary wires configuration and logging; everything reachable over HTTP
//! lives here so the router can be driven in-process by tests.

pub mod app;
pub mod extract;
pub mod response;
pub mod routes;
pub mod state;

pub use app::build_router;
pub use response::{ApiError, Envelope};
pub use state::AppState;
