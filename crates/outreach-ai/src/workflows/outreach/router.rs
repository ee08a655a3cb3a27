use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::capabilities::{ClientDataSource, InventoryMatcher, MessageComposer, ProfileAnalyzer};
use super::domain::ClientId;
use super::service::{ClientOutreachService, OutreachError};

/// Router builder exposing the outreach pipeline over HTTP.
pub fn outreach_router<S, P, M, C>(service: Arc<ClientOutreachService<S, P, M, C>>) -> Router
where
    S: ClientDataSource + 'static,
    P: ProfileAnalyzer + 'static,
    M: InventoryMatcher + 'static,
    C: MessageComposer + 'static,
{
    Router::new()
        .route(
            "/api/v1/outreach/clients/:client_id",
            post(process_handler::<S, P, M, C>),
        )
        .with_state(service)
}

pub(crate) async fn process_handler<S, P, M, C>(
    State(service): State<Arc<ClientOutreachService<S, P, M, C>>>,
    Path(client_id): Path<String>,
) -> Response
where
    S: ClientDataSource + 'static,
    P: ProfileAnalyzer + 'static,
    M: InventoryMatcher + 'static,
    C: MessageComposer + 'static,
{
    let id = ClientId(client_id);
    match service.process_client(&id).await {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => {
            let status = match &error {
                OutreachError::ClientNotFound(_) => StatusCode::NOT_FOUND,
                OutreachError::Capability { .. } | OutreachError::Contract(_) => {
                    StatusCode::BAD_GATEWAY
                }
            };
            let payload = json!({
                "error": error.to_string(),
                "kind": error.kind(),
            });
            (status, axum::Json(payload)).into_response()
        }
    }
}
