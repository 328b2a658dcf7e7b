//! Risk scoring components

pub mod aggregator;
pub mod assessors;
pub mod engine;
pub mod noise;
pub mod rules;

pub use aggregator::ScoreAggregator;
pub use assessors::{RiskAssessment, RiskAssessor};
pub use engine::ScoringEngine;
pub use noise::{FixedNoise, NoiseSource, SeededNoise, ThreadRngNoise};
pub use rules::RuleTables;
