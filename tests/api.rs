use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fraudguard::{
    api::{app, AppState},
    metrics::ServiceMetrics,
    scoring::{FixedNoise, RuleTables, ScoringEngine},
    RiskLevelThresholds,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

fn test_state() -> AppState {
    let engine = ScoringEngine::with_noise(
        RiskLevelThresholds::default(),
        RuleTables::default(),
        Arc::new(FixedNoise::zero()),
    );
    AppState::new(Arc::new(engine), Arc::new(ServiceMetrics::new()), 100)
}

fn test_app(state: AppState) -> Router {
    app(state, &[])
}

fn everyday_purchase() -> Value {
    json!({
        "amount": 1250.00,
        "currency": "USD",
        "merchantId": "AMAZON_001",
        "paymentMethod": "credit_card",
        "customerEmail": "alice.johnson@gmail.com",
        "timestamp": "2024-01-15T14:30:00Z"
    })
}

fn crypto_cashout() -> Value {
    json!({
        "amount": 75000.00,
        "currency": "NGN",
        "merchantId": "CRYPTO_EXCHANGE_001",
        "paymentMethod": "digital_wallet",
        "customerEmail": "user123@tempmail.org",
        "timestamp": "2024-01-15T02:30:00"
    })
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post_raw(router: Router, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri("/predict")
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    read(response).await
}

async fn predict(router: Router, body: Value) -> (StatusCode, Value) {
    post_raw(router, serde_json::to_vec(&body).unwrap()).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn health_endpoint_works() {
    let (status, body) = get(test_app(test_state()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn root_lists_endpoints() {
    let (status, body) = get(test_app(test_state()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["health"], "/health");
    assert_eq!(body["modelInfo"], "/model/info");
}

#[tokio::test]
async fn model_info_reports_engine_thresholds() {
    let engine = ScoringEngine::with_noise(
        RiskLevelThresholds {
            low: 0.2,
            medium: 0.5,
            high: 0.7,
        },
        RuleTables::default(),
        Arc::new(FixedNoise::zero()),
    );
    let state = AppState::new(Arc::new(engine), Arc::new(ServiceMetrics::new()), 100);

    let (status, body) = get(test_app(state), "/model/info").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["riskThresholds"], json!({"low": 0.2, "medium": 0.5, "high": 0.7}));
    assert_eq!(body["features"].as_array().unwrap().len(), 6);
    assert_eq!(body["supportedCurrencies"].as_array().unwrap().len(), 7);
    assert_eq!(
        body["supportedPaymentMethods"],
        json!(["credit_card", "debit_card", "bank_transfer", "digital_wallet", "cash"])
    );
}

#[tokio::test]
async fn predict_scores_batch_in_order() {
    let body = json!({ "transactions": [everyday_purchase(), crypto_cashout()] });
    let (status, body) = predict(test_app(test_state()), body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalProcessed"], 2);
    assert_eq!(body["highRiskCount"], 1);

    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 2);

    let first = &predictions[0];
    assert_eq!(first["riskScore"], 0.35);
    assert_eq!(first["riskLevel"], "low");
    assert_eq!(first["isFraud"], false);

    let second = &predictions[1];
    assert_eq!(second["riskScore"], 1.0);
    assert_eq!(second["riskLevel"], "high");
    assert_eq!(second["isFraud"], true);
    assert_eq!(second["riskFactors"].as_array().unwrap().len(), 6);
    assert!(second["processingTime"].as_f64().unwrap() >= 0.0);

    assert_eq!(body["averageRiskScore"], 0.675);
}

#[tokio::test]
async fn predict_rejects_empty_batch() {
    let (status, body) = predict(test_app(test_state()), json!({ "transactions": [] })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn predict_rejects_oversized_batch() {
    let transactions: Vec<Value> = (0..101).map(|_| everyday_purchase()).collect();
    let (status, body) = predict(test_app(test_state()), json!({ "transactions": transactions })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("101"));
}

#[tokio::test]
async fn predict_rejects_whole_batch_on_bad_email() {
    let mut bad = everyday_purchase();
    bad["customerEmail"] = json!("not-an-email");
    let body = json!({ "transactions": [everyday_purchase(), bad] });

    let (status, body) = predict(test_app(test_state()), body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["detail"],
        "transactions[1].customerEmail: Invalid email format"
    );
}

#[tokio::test]
async fn predict_rejects_malformed_json() {
    let (status, body) = post_raw(test_app(test_state()), b"{\"transactions\": [".to_vec()).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn predict_rejects_missing_field() {
    let mut incomplete = everyday_purchase();
    incomplete.as_object_mut().unwrap().remove("merchantId");

    let (status, _) = predict(
        test_app(test_state()),
        json!({ "transactions": [incomplete] }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn metrics_count_requests_and_rejections() {
    let state = test_state();

    let body = json!({ "transactions": [everyday_purchase(), crypto_cashout()] });
    let (status, _) = predict(test_app(state.clone()), body).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = predict(test_app(state.clone()), json!({ "transactions": [] })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = get(test_app(state), "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requestsTotal"], 2);
    assert_eq!(body["requestsRejected"], 1);
    assert_eq!(body["transactionsScored"], 2);
    assert_eq!(body["predictionsByLevel"]["high"], 1);
}

#[tokio::test]
async fn predict_accepts_string_amount_and_blank_timestamp() {
    let cash = json!({
        "amount": "100.00",
        "currency": "USD",
        "merchantId": "SHOP_1",
        "paymentMethod": "cash",
        "customerEmail": "shopper@example.com",
        "timestamp": ""
    });

    let (status, body) = predict(test_app(test_state()), json!({ "transactions": [cash] })).await;

    assert_eq!(status, StatusCode::OK);
    let prediction = &body["predictions"][0];
    assert_eq!(prediction["riskScore"], 0.0);
    assert_eq!(prediction["riskFactors"], json!([]));
}
