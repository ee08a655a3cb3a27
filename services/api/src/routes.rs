use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use outreach_ai::workflows::outreach::capabilities::{
    ClientDataSource, InventoryMatcher, MessageComposer, ProfileAnalyzer,
};
use outreach_ai::workflows::outreach::{outreach_router, ClientOutreachService};
use serde_json::json;

use crate::infra::AppState;

/// Wraps the library's outreach router with the service-level operational
/// endpoints.
pub(crate) fn with_outreach_routes<S, P, M, C>(
    service: Arc<ClientOutreachService<S, P, M, C>>,
) -> axum::Router
where
    S: ClientDataSource + 'static,
    P: ProfileAnalyzer + 'static,
    M: InventoryMatcher + 'static,
    C: MessageComposer + 'static,
{
    outreach_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
