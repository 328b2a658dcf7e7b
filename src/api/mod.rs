//! HTTP surface of the scoring service

pub mod handlers;

use crate::config::AppConfig;
use crate::metrics::ServiceMetrics;
use crate::scoring::ScoringEngine;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ScoringEngine>,
    pub metrics: Arc<ServiceMetrics>,
    pub max_batch_size: usize,
}

impl AppState {
    pub fn new(engine: Arc<ScoringEngine>, metrics: Arc<ServiceMetrics>, max_batch_size: usize) -> Self {
        Self {
            engine,
            metrics,
            max_batch_size,
        }
    }

    /// Build the engine and fresh counters from configuration
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(ScoringEngine::new(config)),
            Arc::new(ServiceMetrics::new()),
            config.detection.max_batch_size,
        )
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn app(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/model/info", get(handlers::model_info))
        .route("/metrics", get(handlers::metrics))
        .route("/predict", post(handlers::predict))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
