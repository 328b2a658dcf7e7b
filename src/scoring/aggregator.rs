//! Combination of assessor contributions into a single risk score

use crate::scoring::assessors::RiskAssessment;
use crate::scoring::noise::NoiseSource;

/// Upper bound of the residual-uncertainty perturbation
pub const DEFAULT_MAX_PERTURBATION: f64 = 0.05;

/// Summed and clamped result of all assessors for one transaction
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRisk {
    /// Sum of contributions before noise and clamping
    pub raw_score: f64,
    /// Final score in [0, 1]
    pub risk_score: f64,
    /// Factors in assessor order
    pub factors: Vec<String>,
}

/// Sums assessor contributions, adds bounded noise and clamps to [0, 1].
pub struct ScoreAggregator {
    max_perturbation: f64,
}

impl ScoreAggregator {
    pub fn new(max_perturbation: f64) -> Self {
        Self {
            max_perturbation: max_perturbation.max(0.0),
        }
    }

    pub fn max_perturbation(&self) -> f64 {
        self.max_perturbation
    }

    /// Plain sum of contributions
    pub fn raw_sum(assessments: &[RiskAssessment]) -> f64 {
        assessments.iter().map(|a| a.contribution).sum()
    }

    /// Aggregate assessments, drawing the perturbation from `noise`
    pub fn aggregate(
        &self,
        assessments: Vec<RiskAssessment>,
        noise: &dyn NoiseSource,
    ) -> AggregatedRisk {
        let raw_score = Self::raw_sum(&assessments);
        let factors: Vec<String> = assessments.into_iter().flat_map(|a| a.factors).collect();

        let perturbation = noise.uniform(0.0, self.max_perturbation);
        let risk_score = (raw_score + perturbation).clamp(0.0, 1.0);

        AggregatedRisk {
            raw_score,
            risk_score,
            factors,
        }
    }
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PERTURBATION)
    }
}
