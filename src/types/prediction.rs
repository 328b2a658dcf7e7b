//! Fraud prediction output structures

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Risk level classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Determine risk level from score and thresholds, highest bucket first
    pub fn from_score(score: f64, thresholds: &RiskLevelThresholds) -> Self {
        if score >= thresholds.high {
            RiskLevel::High
        } else if score >= thresholds.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configurable risk level thresholds.
///
/// `low` is informational only: anything under `medium` is low. The `high`
/// boundary doubles as the fraud cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskLevelThresholds {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl Default for RiskLevelThresholds {
    fn default() -> Self {
        Self {
            low: 0.3,
            medium: 0.6,
            high: 0.8,
        }
    }
}

/// Verdict for a single transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudPrediction {
    /// Whether the transaction is predicted as fraud
    pub is_fraud: bool,
    /// Simulated certainty (0.5 - 0.99)
    pub confidence: f64,
    /// Clamped risk score (0.0 - 1.0), rounded to 3 decimals
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Factors in assessor order
    pub risk_factors: Vec<String>,
    /// Scoring time, milliseconds on the wire
    #[serde(with = "duration_ms")]
    pub processing_time: Duration,
}

/// Predictions for a whole batch plus summary statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub predictions: Vec<FraudPrediction>,
    pub total_processed: usize,
    pub average_risk_score: f64,
    pub high_risk_count: usize,
}

impl BatchResult {
    /// Summarize predictions, keeping their order
    pub fn from_predictions(predictions: Vec<FraudPrediction>) -> Self {
        let total_processed = predictions.len();
        let high_risk_count = predictions
            .iter()
            .filter(|p| p.risk_level == RiskLevel::High)
            .count();

        let average_risk_score = if total_processed > 0 {
            let sum: f64 = predictions.iter().map(|p| p.risk_score).sum();
            round_decimals(sum / total_processed as f64, 3)
        } else {
            0.0
        };

        Self {
            predictions,
            total_processed,
            average_risk_score,
            high_risk_count,
        }
    }
}

/// Round half away from zero to `places` decimals
pub fn round_decimals(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

mod duration_ms {
    use super::round_decimals;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(round_decimals(value.as_secs_f64() * 1000.0, 2))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(ms.max(0.0) / 1000.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(risk_score: f64, risk_level: RiskLevel) -> FraudPrediction {
        FraudPrediction {
            is_fraud: risk_level == RiskLevel::High,
            confidence: 0.7,
            risk_score,
            risk_level,
            risk_factors: Vec::new(),
            processing_time: Duration::from_micros(120),
        }
    }

    #[test]
    fn test_risk_level_from_score() {
        let thresholds = RiskLevelThresholds::default();

        assert_eq!(RiskLevel::from_score(0.1, &thresholds), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.3, &thresholds), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(0.6, &thresholds), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.799, &thresholds), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(0.8, &thresholds), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(1.0, &thresholds), RiskLevel::High);
    }

    #[test]
    fn test_batch_summary() {
        let batch = BatchResult::from_predictions(vec![
            prediction(0.2, RiskLevel::Low),
            prediction(0.9, RiskLevel::High),
            prediction(0.7, RiskLevel::Medium),
            prediction(1.0, RiskLevel::High),
        ]);

        assert_eq!(batch.total_processed, 4);
        assert_eq!(batch.high_risk_count, 2);
        assert!((batch.average_risk_score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_prediction_wire_format() {
        let json = serde_json::to_value(prediction(0.85, RiskLevel::High)).unwrap();

        assert_eq!(json["isFraud"], true);
        assert_eq!(json["riskLevel"], "high");
        assert_eq!(json["riskScore"], 0.85);
        assert_eq!(json["processingTime"], 0.12);
        assert!(json["riskFactors"].as_array().unwrap().is_empty());
    }
}
