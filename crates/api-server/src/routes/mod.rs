//! Route handlers

pub mod assistants;
pub mod health;
pub mod runs;

use axum::Router;
use serde::Serialize;

use crate::state::AppState;

/// `{"status": "ok"}` acknowledgement
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Build the full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(assistants::router())
        .nest("/runs", runs::router(state.telemetry_enabled()))
        .with_state(state)
}
