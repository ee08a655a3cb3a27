use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use outreach_ai::workflows::outreach::capabilities::{
    AnalysisError, ClientDataSource, ComposeError, DataSourceError, InventoryMatcher, MatchError,
    MessageComposer, ProfileAnalyzer,
};
use outreach_ai::workflows::outreach::domain::{
    ClientId, ClientProfile, ClientRecord, InventoryCandidate,
};
use outreach_ai::workflows::outreach::{outreach_router, CallPolicy, ClientOutreachService};
use serde_json::Value;
use tower::util::ServiceExt;

struct SeededStore {
    record: ClientRecord,
}

#[async_trait]
impl ClientDataSource for SeededStore {
    async fn fetch(&self, client_id: &ClientId) -> Result<Option<ClientRecord>, DataSourceError> {
        if *client_id == self.record.client_id {
            Ok(Some(self.record.clone()))
        } else {
            Ok(None)
        }
    }
}

struct FixedAnalyzer {
    profile: ClientProfile,
}

#[async_trait]
impl ProfileAnalyzer for FixedAnalyzer {
    async fn analyze(&self, _record: &ClientRecord) -> Result<ClientProfile, AnalysisError> {
        Ok(self.profile.clone())
    }
}

struct FixedMatcher {
    candidates: Vec<InventoryCandidate>,
}

#[async_trait]
impl InventoryMatcher for FixedMatcher {
    async fn rank(
        &self,
        _profile: &ClientProfile,
    ) -> Result<Vec<InventoryCandidate>, MatchError> {
        Ok(self.candidates.clone())
    }
}

struct OfflineMatcher;

#[async_trait]
impl InventoryMatcher for OfflineMatcher {
    async fn rank(
        &self,
        _profile: &ClientProfile,
    ) -> Result<Vec<InventoryCandidate>, MatchError> {
        Err(MatchError::Unavailable("index offline".to_string()))
    }
}

struct FixedComposer;

#[async_trait]
impl MessageComposer for FixedComposer {
    async fn compose(
        &self,
        profile: &ClientProfile,
        candidate: Option<&InventoryCandidate>,
    ) -> Result<String, ComposeError> {
        Ok(match candidate {
            Some(unit) => format!(
                "Hi {}! I have a unit for you: {} in {} for {}/mo.",
                profile.first_name,
                unit.unit_name,
                unit.area,
                unit.rent_range_label()
            ),
            None => format!("Hi {}! Nothing fits just yet; want to adjust?", profile.first_name),
        })
    }
}

fn record() -> ClientRecord {
    ClientRecord {
        client_id: ClientId("691481".to_string()),
        full_name: "Jordan Avery".to_string(),
        email: None,
        gross_monthly_income: Some(7_400),
        credit_score: Some(705),
        budget_min: Some(2_100),
        budget_max: Some(2_350),
        desired_move_in: NaiveDate::from_ymd_opt(2026, 9, 1),
        bedrooms: 2,
        bathrooms: 2,
        preferred_areas: vec!["Lombard".to_string()],
        notes: None,
    }
}

fn profile() -> ClientProfile {
    ClientProfile {
        client_id: ClientId("691481".to_string()),
        first_name: "Jordan".to_string(),
        bedrooms_needed: 2,
        bathrooms_needed: 2,
        budget_ceiling: 2_350,
        target_area: "Lombard".to_string(),
        move_in_by: NaiveDate::from_ymd_opt(2026, 9, 1),
        risk_factors: Vec::new(),
    }
}

fn candidate() -> InventoryCandidate {
    InventoryCandidate {
        unit_name: "Apex 41".to_string(),
        address: "41 E St Charles Rd, Lombard, IL 60148".to_string(),
        area: "Lombard".to_string(),
        bedrooms: 2,
        bathrooms: 2,
        rent_min: 2_234,
        rent_max: 2_318,
        available_on: NaiveDate::from_ymd_opt(2026, 8, 15),
        move_in_special: None,
        net_effective_rent: None,
    }
}

fn fast_policy() -> CallPolicy {
    CallPolicy {
        timeout: Duration::from_millis(200),
        max_retries: 0,
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    }
}

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn process_endpoint_returns_the_wire_shape() {
    let service = Arc::new(ClientOutreachService::with_policy(
        Arc::new(SeededStore { record: record() }),
        Arc::new(FixedAnalyzer { profile: profile() }),
        Arc::new(FixedMatcher {
            candidates: vec![candidate()],
        }),
        Arc::new(FixedComposer),
        fast_policy(),
    ));
    let app = outreach_router(service);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/outreach/clients/691481")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let object = body.as_object().expect("object body");
    assert_eq!(object.len(), 3);
    assert_eq!(body["inventory_found"], Value::Bool(true));
    assert!(body["message"]
        .as_str()
        .expect("message string")
        .contains("Apex 41"));
}

#[tokio::test]
async fn unknown_client_maps_to_not_found() {
    let service = Arc::new(ClientOutreachService::with_policy(
        Arc::new(SeededStore { record: record() }),
        Arc::new(FixedAnalyzer { profile: profile() }),
        Arc::new(FixedMatcher {
            candidates: Vec::new(),
        }),
        Arc::new(FixedComposer),
        fast_policy(),
    ));
    let app = outreach_router(service);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/outreach/clients/000000")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["kind"], Value::String("client_not_found".to_string()));
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let service = Arc::new(ClientOutreachService::with_policy(
        Arc::new(SeededStore { record: record() }),
        Arc::new(FixedAnalyzer { profile: profile() }),
        Arc::new(OfflineMatcher),
        Arc::new(FixedComposer),
        fast_policy(),
    ));
    let app = outreach_router(service);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/outreach/clients/691481")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = read_json_body(response).await;
    assert_eq!(body["kind"], Value::String("upstream_failure".to_string()));
}
