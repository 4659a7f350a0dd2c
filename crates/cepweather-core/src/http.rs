//! Response shape and routes common to both cepweather services.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

/// Body of every error response: `{"message": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

pub fn message_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(MessageBody {
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Add `/healthz`, JSON 404/405 fallbacks and request tracing to a service router.
///
/// Call after the service's own routes so the 405 fallback covers them.
pub fn with_service_routes<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .route("/healthz", get(healthz))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn not_found() -> Response {
    message_response(StatusCode::NOT_FOUND, "not found")
}

async fn method_not_allowed() -> Response {
    message_response(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}
