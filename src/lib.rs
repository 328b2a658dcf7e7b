//! FraudGuard Risk Engine Library
//!
//! Rule-based fraud risk scoring for payment transactions: six independent
//! assessors feed an additive score, which is classified into a risk level
//! and served over HTTP in batches.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod scoring;
pub mod types;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, ValidationError};
pub use scoring::ScoringEngine;
pub use types::{
    prediction::{BatchResult, FraudPrediction, RiskLevel, RiskLevelThresholds},
    transaction::{Currency, PaymentMethod, PredictRequest, Transaction, TransactionInput},
};
