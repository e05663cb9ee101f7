use crate::response::Envelope;
use crate::state::AppState;
use axum::extract::State;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

/// Liveness probe; never touches the scrape targets
pub async fn health_handler(State(state): State<AppState>) -> Envelope<Health> {
    Envelope::ok(Health {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}
