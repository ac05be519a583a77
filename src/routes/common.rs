//! Probe routes: GET /health, GET /ready, GET /info.

use crate::handlers::common::{health, info, ready};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn probe_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/info", get(info))
        .with_state(state)
}
