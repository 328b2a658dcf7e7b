//! Rule-based scoring engine for fraud detection

use crate::config::AppConfig;
use crate::scoring::aggregator::ScoreAggregator;
use crate::scoring::assessors::RiskAssessor;
use crate::scoring::noise::{NoiseSource, SeededNoise, ThreadRngNoise};
use crate::scoring::rules::RuleTables;
use crate::types::prediction::{round_decimals, BatchResult, FraudPrediction, RiskLevel, RiskLevelThresholds};
use crate::types::transaction::Transaction;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

const CONFIDENCE_BASE: f64 = 0.5;
const CONFIDENCE_SLOPE: f64 = 0.4;
const CONFIDENCE_JITTER: f64 = 0.1;
const CONFIDENCE_FLOOR: f64 = 0.5;
const CONFIDENCE_CEILING: f64 = 0.99;

/// Stateless scorer turning validated transactions into predictions.
///
/// The engine holds only read-only tables and a noise source, so a single
/// instance can be shared behind an `Arc` and called from any number of
/// requests at once.
pub struct ScoringEngine {
    assessor: RiskAssessor,
    aggregator: ScoreAggregator,
    thresholds: RiskLevelThresholds,
    noise: Arc<dyn NoiseSource>,
}

impl ScoringEngine {
    /// Create a scoring engine from configuration
    pub fn new(config: &AppConfig) -> Self {
        let noise: Arc<dyn NoiseSource> = match config.detection.noise_seed {
            Some(seed) => {
                info!(seed = seed, "Using seeded noise source");
                Arc::new(SeededNoise::new(seed))
            }
            None => Arc::new(ThreadRngNoise),
        };

        let engine = Self::with_noise(
            config.detection.risk_levels.clone(),
            config.rules.clone(),
            noise,
        );

        info!(
            low = engine.thresholds.low,
            medium = engine.thresholds.medium,
            high = engine.thresholds.high,
            "Scoring engine initialized"
        );

        engine
    }

    /// Create a scoring engine with an explicit noise source
    pub fn with_noise(
        thresholds: RiskLevelThresholds,
        rules: RuleTables,
        noise: Arc<dyn NoiseSource>,
    ) -> Self {
        Self {
            assessor: RiskAssessor::new(rules),
            aggregator: ScoreAggregator::default(),
            thresholds,
            noise,
        }
    }

    pub fn thresholds(&self) -> &RiskLevelThresholds {
        &self.thresholds
    }

    pub fn rules(&self) -> &RuleTables {
        self.assessor.rules()
    }

    /// Fraud is flagged at the same boundary as the high risk level
    pub fn is_fraud(&self, risk_score: f64) -> bool {
        risk_score >= self.thresholds.high
    }

    /// Confidence rises with the risk score, with bounded jitter
    pub fn confidence(&self, risk_score: f64) -> f64 {
        let jitter = self.noise.uniform(-CONFIDENCE_JITTER, CONFIDENCE_JITTER);
        let confidence = (CONFIDENCE_BASE + risk_score * CONFIDENCE_SLOPE + jitter)
            .clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING);
        round_decimals(confidence, 3)
    }

    /// Score a single transaction
    pub fn score(&self, tx: &Transaction) -> FraudPrediction {
        let start = Instant::now();

        let assessments = self.assessor.assess(tx);
        let aggregated = self.aggregator.aggregate(assessments, self.noise.as_ref());

        // Classify on the published (rounded) score so level and score agree
        let risk_score = round_decimals(aggregated.risk_score, 3);
        let risk_level = RiskLevel::from_score(risk_score, &self.thresholds);
        let is_fraud = self.is_fraud(risk_score);
        let confidence = self.confidence(risk_score);

        FraudPrediction {
            is_fraud,
            confidence,
            risk_score,
            risk_level,
            risk_factors: aggregated.factors,
            processing_time: start.elapsed(),
        }
    }

    /// Score a batch in input order.
    ///
    /// Transactions are independent; any failure while scoring fails the
    /// whole batch at the caller.
    pub fn score_batch(&self, transactions: &[Transaction]) -> BatchResult {
        let start = Instant::now();
        info!(count = transactions.len(), "Processing transactions");

        let predictions: Vec<FraudPrediction> = transactions
            .iter()
            .enumerate()
            .map(|(i, tx)| {
                let prediction = self.score(tx);
                debug!(
                    index = i + 1,
                    risk_score = prediction.risk_score,
                    risk_level = %prediction.risk_level,
                    is_fraud = prediction.is_fraud,
                    "Transaction scored"
                );
                prediction
            })
            .collect();

        let result = BatchResult::from_predictions(predictions);

        info!(
            total = result.total_processed,
            average_risk_score = result.average_risk_score,
            high_risk = result.high_risk_count,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Batch processing completed"
        );

        result
    }
}
