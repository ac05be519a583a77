//! Router assembly.

mod book;
mod common;

pub use book::book_routes;
pub use common::probe_routes;

use crate::handlers::book::not_found;
use crate::response::MessageBody;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::header::{ALLOW, CONTENT_TYPE},
    middleware::map_response,
    response::{IntoResponse, Response},
    Json, Router,
};
use tower_http::trace::TraceLayer;

/// Full application: book routes, probes, JSON 404 fallback, body limit and request tracing.
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .merge(probe_routes(state.clone()))
        .merge(book_routes(state))
        .fallback(not_found)
        .layer(map_response(json_error_body))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
}

/// Error replies produced outside the handlers (e.g. 405 from method routing) carry no
/// JSON body; give them `{"message": <reason>}`. `Allow` is kept.
async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .is_some_and(|v| v.as_bytes().starts_with(b"application/json"));
    if is_json || !(status.is_client_error() || status.is_server_error()) {
        return response;
    }
    let (parts, _) = response.into_parts();
    let text = status.canonical_reason().unwrap_or("Request failed");
    let mut replaced = (status, Json(MessageBody::new(text))).into_response();
    if let Some(allow) = parts.headers.get(ALLOW) {
        replaced.headers_mut().insert(ALLOW, allow.clone());
    }
    replaced
}
