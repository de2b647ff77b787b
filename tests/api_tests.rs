/// Router tests for the HTTP surface
/// Drives the handlers in-process with `tower::ServiceExt::oneshot`
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use credit_insights_api::analyzer::CreditAnalyzer;
use credit_insights_api::config::Config;
use credit_insights_api::errors::AppError;
use credit_insights_api::handlers::{self, AppState};
use credit_insights_api::insights::InsightsSettings;
use credit_insights_api::llm_client::{
    ChatCompletionRequest, ChatCompletionResponse, CompletionClient,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct OfflineClient;

#[async_trait]
impl CompletionClient for OfflineClient {
    async fn chat_completion(
        &self,
        _request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, AppError> {
        Err(AppError::ExternalApiError("offline".to_string()))
    }
}

fn create_test_config() -> Config {
    Config {
        port: 8080,
        llm_api_key: "test_key".to_string(),
        llm_base_url: "http://localhost:9".to_string(),
        llm_model: "gpt-4".to_string(),
        llm_temperature: 0.7,
        llm_max_tokens: 200,
        llm_timeout_secs: 1,
        insights_cache_ttl_secs: 0,
        insights_failure_threshold: 5,
    }
}

fn app() -> Router {
    let config = create_test_config();
    let analyzer = CreditAnalyzer::new(
        Arc::new(OfflineClient),
        InsightsSettings::from_config(&config),
    );
    let state = Arc::new(AppState {
        config,
        analyzer: Arc::new(analyzer),
    });

    Router::new()
        .route("/health", get(handlers::health))
        .merge(handlers::api_routes())
        .with_state(state)
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model"], "gpt-4");
}

#[tokio::test]
async fn test_analysis_endpoint() {
    let (status, body) = post_json(
        "/api/v1/analysis",
        json!({
            "currentScore": 620,
            "utilization": 60,
            "ageOfCredit": 6,
            "negativeItems": [{"type": "collection", "age": 1, "verified": false}],
            "collections": [{"amount": 450, "validationReceived": false}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["requestId"].is_string());
    assert!(body["analyzedAt"].is_string());
    let analysis = &body["analysis"];
    // 100 - 5 (negative) - 10 (util) - 8 (collection)
    assert_eq!(analysis["healthScore"], 77);
    assert_eq!(analysis["overallHealth"], "good");
    assert_eq!(analysis["aiInsights"].as_array().unwrap().len(), 3);
    assert_eq!(analysis["aiInsights"][0], "Focus on high-impact items first");
    assert!(analysis["ficoFactors"]["paymentHistory"]["weight"].is_number());
    // currentScore, utilization, ageOfCredit and a non-empty negativeItems of seven
    assert_eq!(analysis["dataCompleteness"], 57);
}

#[tokio::test]
async fn test_analysis_with_huge_utilization() {
    let (status, body) = post_json("/api/v1/analysis", json!({"utilization": 1e10})).await;

    assert_eq!(status, StatusCode::OK);
    let impact = &body["analysis"]["estimatedImpact"];
    assert_eq!(impact["improvingUtilization"], 7_999_999_992u64);
    assert_eq!(impact["total"], 7_999_999_992u64 + 40);
}

#[tokio::test]
async fn test_timeline_with_extreme_goal() {
    let (status, body) = post_json(
        "/api/v1/timeline",
        json!({"currentScore": 0, "goalScore": i32::MAX}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimatedMonths"], 268_435_456);
    assert_eq!(body["achievable"], false);
    assert_eq!(body["projections"].as_array().unwrap().len(), 24);
}

#[tokio::test]
async fn test_dispute_success_endpoint() {
    let (status, body) = post_json(
        "/api/v1/disputes/success",
        json!({"type": "bankruptcy", "verified": true, "age": 3}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["successProbability"], 30);
}

#[tokio::test]
async fn test_timeline_endpoint() {
    let (status, body) = post_json(
        "/api/v1/timeline",
        json!({
            "currentScore": 600,
            "goalScore": 700,
            "profile": {"latePayments": [{}]}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimatedMonths"], 20);
    assert_eq!(body["monthlyRate"], 5);
    assert_eq!(body["achievable"], true);
    assert_eq!(body["projections"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_timeline_rejects_negative_scores() {
    let (status, body) = post_json(
        "/api/v1/timeline",
        json!({"currentScore": -10, "goalScore": 700}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("currentScore"));
}

#[tokio::test]
async fn test_action_plan_endpoint() {
    let (status, body) = post_json(
        "/api/v1/action-plan",
        json!({
            "profile": {"currentScore": 600, "utilization": 75, "ageOfCredit": 3},
            "goalScore": 700,
            "timeframe": 12
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["requestId"].is_string());
    assert_eq!(body["plan"]["phases"].as_array().unwrap().len(), 3);
    assert_eq!(body["plan"]["timeframeMonths"], 12);
    let milestones = body["plan"]["milestones"].as_array().unwrap();
    assert_eq!(milestones.len(), 3);
    assert!(milestones
        .iter()
        .all(|m| m["expectedScore"].as_i64().unwrap() <= 700));
}

#[tokio::test]
async fn test_action_plan_rejects_zero_timeframe() {
    let (status, body) = post_json(
        "/api/v1/action-plan",
        json!({"profile": {}, "goalScore": 700, "timeframe": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("timeframe"));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/analysis")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
