use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::assessments::router::{assessment_router, submit_handler};
use crate::assessments::session::AssessmentService;
use crate::config::AssessmentConfig;
use crate::identity::USER_ID_HEADER;

fn router_with_store(store: Arc<MemoryStore>) -> axum::Router {
    assessment_router(Arc::new(AssessmentService::new(
        store,
        AssessmentConfig::default(),
    )))
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(USER_ID_HEADER, user().as_str())
        .body(Body::from(serde_json::to_vec(body).expect("encode body")))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri)
        .header(USER_ID_HEADER, user().as_str())
        .body(Body::empty())
        .expect("request builds")
}

fn high_risk_payload() -> Value {
    json!({
        "yearsOfUse": "12",
        "substanceType": ["opioids"],
        "frequency": "daily",
        "stressLevel": 10,
        "sleepQuality": 1,
        "supportSystem": "none",
        "lastRelapse": "recent",
        "triggers": ["stress", "loneliness"],
        "copingStrategies": []
    })
}

#[tokio::test]
async fn submit_route_stores_and_returns_result() {
    let store = Arc::new(MemoryStore::default());
    let router = router_with_store(store.clone());

    let response = router
        .oneshot(post_json("/api/v1/assessments/risk", &high_risk_payload()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["outcome"]["score"], 100);
    assert_eq!(payload["outcome"]["category"], "High Risk");
    assert_eq!(payload["assessment"]["responses"]["frequency"], "daily");
    assert_eq!(store.rows("risk_assessments").len(), 1);
}

#[tokio::test]
async fn submit_handler_reports_missing_answers() {
    let service = Arc::new(AssessmentService::new(
        Arc::new(MemoryStore::default()),
        AssessmentConfig::default(),
    ));
    let mut headers = HeaderMap::new();
    headers.insert(USER_ID_HEADER, "user-042".parse().expect("header value"));

    let response = submit_handler::<MemoryStore>(
        State(service),
        Path("risk".to_string()),
        headers,
        axum::Json(json!({ "substances": ["alcohol"], "frequency": "" })),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["missing"],
        json!(["frequency", "supportSystem", "lastRelapse"])
    );
}

#[tokio::test]
async fn submit_without_identity_is_unauthorized() {
    let store = Arc::new(MemoryStore::default());
    let router = router_with_store(store.clone());

    let response = router
        .oneshot(
            Request::post("/api/v1/assessments/stress")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(store.insert_calls(), 0);
}

#[tokio::test]
async fn submit_returns_service_unavailable_with_result_when_store_fails() {
    let router = assessment_router(Arc::new(AssessmentService::new(
        Arc::new(UnavailableStore),
        AssessmentConfig::default(),
    )));

    let response = router
        .oneshot(post_json("/api/v1/assessments/stress", &json!({})))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let payload = read_json_body(response).await;
    assert_eq!(payload["retryable"], true);
    assert_eq!(payload["result"]["score"], 13);
}

#[tokio::test]
async fn unknown_variant_is_not_found() {
    let router = router_with_store(Arc::new(MemoryStore::default()));

    let response = router
        .oneshot(get("/api/v1/assessments/anxiety/latest"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn latest_route_reports_none_then_found() {
    let store = Arc::new(MemoryStore::default());
    let router = router_with_store(store.clone());

    let empty = router
        .clone()
        .oneshot(get("/api/v1/assessments/risk/latest"))
        .await
        .expect("route executes");
    assert_eq!(empty.status(), StatusCode::OK);
    let payload = read_json_body(empty).await;
    assert_eq!(payload["status"], "none");
    assert_eq!(payload["required_fields"][0], "substances");

    router
        .clone()
        .oneshot(post_json("/api/v1/assessments/risk", &high_risk_payload()))
        .await
        .expect("submit executes");

    let found = router
        .oneshot(get("/api/v1/assessments/risk/latest"))
        .await
        .expect("route executes");
    let payload = read_json_body(found).await;
    assert_eq!(payload["status"], "found");
    assert_eq!(payload["assessment"]["score"], 100);
    assert_eq!(
        payload["assessment"]["recommendations"]
            .as_array()
            .map(Vec::len),
        Some(7)
    );
}

#[tokio::test]
async fn history_route_honours_limit() {
    let store = Arc::new(MemoryStore::default());
    let router = router_with_store(store.clone());
    for _ in 0..3 {
        router
            .clone()
            .oneshot(post_json("/api/v1/assessments/stress", &json!({ "stress_level": 7 })))
            .await
            .expect("submit executes");
    }

    let response = router
        .oneshot(get("/api/v1/assessments/stress/history?limit=2"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let assessments = payload["assessments"].as_array().expect("array");
    assert_eq!(assessments.len(), 2);
    assert_eq!(assessments[0]["id"], "asm-003");
}

#[tokio::test]
async fn score_route_previews_without_storing() {
    let store = Arc::new(MemoryStore::default());
    let router = router_with_store(store.clone());

    let response = router
        .oneshot(
            Request::post("/api/v1/assessments/stress/score")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["score"], 13);
    assert_eq!(payload["category"], "Low Stress");
    assert_eq!(store.insert_calls(), 0);
}

#[tokio::test]
async fn dashboard_route_summarises_latest_results() {
    let store = Arc::new(MemoryStore::default());
    let router = router_with_store(store.clone());
    router
        .clone()
        .oneshot(post_json("/api/v1/assessments/risk", &high_risk_payload()))
        .await
        .expect("submit executes");

    let response = router
        .oneshot(get("/api/v1/dashboard"))
        .await
        .expect("route executes");

    let payload = read_json_body(response).await;
    assert_eq!(payload["user_id"], "user-042");
    assert_eq!(payload["risk"]["category"], "High Risk");
    assert!(payload["stress"].is_null());
}

#[tokio::test]
async fn crisis_plan_route_returns_text_attachment() {
    let store = Arc::new(MemoryStore::default());
    let router = router_with_store(store.clone());

    let missing = router
        .clone()
        .oneshot(get("/api/v1/crisis-plan"))
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    router
        .clone()
        .oneshot(post_json(
            "/api/v1/assessments/stress",
            &json!({ "stress_triggers": "deadlines" }),
        ))
        .await
        .expect("submit executes");

    let response = router
        .oneshot(get("/api/v1/crisis-plan"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
        .expect("attachment header");
    assert!(disposition.contains("Crisis_Plan_user_042_"));
    let plan = read_text_body(response).await;
    assert!(plan.starts_with("PERSONAL CRISIS PLAN - USER-042"));
    assert!(plan.contains("• deadlines"));
}

#[tokio::test]
async fn submit_accepts_legacy_and_current_substance_keys_together() {
    let store = Arc::new(MemoryStore::default());
    let router = router_with_store(store.clone());
    let mut payload = high_risk_payload();
    payload["substances"] = json!(["alcohol", "opioids"]);
    payload["substanceType"] = json!("cannabis");

    let response = router
        .oneshot(post_json("/api/v1/assessments/risk", &payload))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(
        body["assessment"]["responses"]["substances"],
        json!(["alcohol", "opioids", "cannabis"])
    );
    assert!(body["assessment"]["responses"].get("substanceType").is_none());
}
