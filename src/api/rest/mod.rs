pub mod agents;
pub mod orders;
pub mod restaurants;
pub mod users;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use tower_http::cors::{Any, CorsLayer};

use crate::observability::metrics::Metrics;

pub(crate) fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub(crate) fn metrics_response(metrics: &Metrics) -> axum::response::Response {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
