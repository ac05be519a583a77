//! Probe handlers: liveness, readiness, service info.

use crate::state::AppState;
use crate::store::COLLECTION;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthBody {
    status: &'static str,
    /// `connected` once bootstrap installed a store, `connecting` before.
    store: &'static str,
}

#[derive(Serialize)]
pub struct ReadyBody {
    status: &'static str,
    store: &'static str,
}

#[derive(Serialize)]
pub struct ServiceInfo {
    service: &'static str,
    version: &'static str,
    collection: &'static str,
}

/// Always 200; the process is alive even while the store is still connecting.
pub async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    let store = if state.store.is_connected() { "connected" } else { "connecting" };
    Json(HealthBody { status: "ok", store })
}

/// 200 when the store answers a ping, 503 while it is unset or unreachable.
pub async fn ready(State(state): State<AppState>) -> Result<Json<ReadyBody>, (StatusCode, Json<ReadyBody>)> {
    let reachable = match state.store.get() {
        Ok(store) => store.ping().await.is_ok(),
        Err(_) => false,
    };
    if !reachable {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyBody {
                status: "degraded",
                store: "unavailable",
            }),
        ));
    }
    Ok(Json(ReadyBody {
        status: "ok",
        store: "ok",
    }))
}

pub async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        collection: COLLECTION,
    })
}
