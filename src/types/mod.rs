//! Type definitions for the risk engine

pub mod prediction;
pub mod transaction;

pub use prediction::{BatchResult, FraudPrediction, RiskLevel, RiskLevelThresholds};
pub use transaction::{Currency, PaymentMethod, PredictRequest, Transaction, TransactionInput};
