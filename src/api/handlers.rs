//! HTTP handlers for the scoring service

use crate::api::AppState;
use crate::error::{AppError, ValidationError};
use crate::metrics::MetricsSnapshot;
use crate::types::prediction::{round_decimals, BatchResult, RiskLevelThresholds};
use crate::types::transaction::{Currency, PaymentMethod, PredictRequest};
use crate::validation::validate_batch;
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info_span, warn};
use uuid::Uuid;

pub const SERVICE_NAME: &str = "FraudGuard Risk Engine";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub health: String,
    pub model_info: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    /// Seconds since the service started
    pub uptime: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub features: Vec<String>,
    pub risk_thresholds: RiskLevelThresholds,
    pub supported_currencies: Vec<String>,
    pub supported_payment_methods: Vec<String>,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        health: "/health".to_string(),
        model_info: "/model/info".to_string(),
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Local::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: round_decimals(state.metrics.uptime().as_secs_f64(), 2),
    })
}

/// Describes the engine; thresholds are read from the live engine.
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfo> {
    let features = [
        "Transaction amount analysis",
        "Payment method risk assessment",
        "Email domain verification",
        "Merchant category analysis",
        "Temporal pattern detection",
        "Currency risk evaluation",
    ];

    Json(ModelInfo {
        name: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        risk_thresholds: state.engine.thresholds().clone(),
        supported_currencies: Currency::ALL.iter().map(|c| c.code().to_string()).collect(),
        supported_payment_methods: PaymentMethod::ALL
            .iter()
            .map(|m| m.as_str().to_string())
            .collect(),
    })
}

pub async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

/// Validate and score a batch of transactions
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<BatchResult>, AppError> {
    let request_number = state.metrics.record_request();
    let batch_id = Uuid::new_v4();

    let transactions = payload
        .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))
        .and_then(|Json(request)| validate_batch(request, state.max_batch_size))
        .map_err(|e| {
            state.metrics.record_rejection();
            warn!(batch_id = %batch_id, error = %e, "Rejected prediction request");
            e
        })?;

    let engine = state.engine.clone();
    let span = info_span!("predict", batch_id = %batch_id, request = request_number);
    let result = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        engine.score_batch(&transactions)
    })
    .await
    .map_err(|e| AppError::internal(format!("scoring task failed: {}", e)))?;

    state.metrics.record_batch(&result);

    Ok(Json(result))
}
