//! # Performance Profile
//!
//! Eight-criterion score card (0-10 each) for a result set, with a target
//! score per criterion. Drop and vibration resistance follow their safety
//! factors and ISTA compliance follows the pass rate; the remaining criteria
//! are a coarse baseline with a little jitter drawn from the session's
//! random source.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::calculations::TestResult;
use crate::errors::{SimError, SimResult};
use crate::scenarios::TestType;

const RESISTANCE_PER_SAFETY: f64 = 3.5;
const MAX_SCORE: f64 = 10.0;
const BASELINE_ALL_PASS: f64 = 7.5;
const BASELINE_WITH_FAILURES: f64 = 6.0;
const BASELINE_JITTER: f64 = 0.5;
const FLAT_TARGET: f64 = 8.2;
const OPTIMIZED_TARGET_CAP: f64 = 8.5;
const OPTIMIZED_TARGET_LIFT: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    StructuralIntegrity,
    MaterialEfficiency,
    CostEffectiveness,
    ManufacturingFeasibility,
    EnvironmentalImpact,
    IstaCompliance,
    DropResistance,
    VibrationResistance,
}

impl Criterion {
    /// All criteria in score-card order
    pub const ALL: [Criterion; 8] = [
        Criterion::StructuralIntegrity,
        Criterion::MaterialEfficiency,
        Criterion::CostEffectiveness,
        Criterion::ManufacturingFeasibility,
        Criterion::EnvironmentalImpact,
        Criterion::IstaCompliance,
        Criterion::DropResistance,
        Criterion::VibrationResistance,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Criterion::StructuralIntegrity => "Structural Integrity",
            Criterion::MaterialEfficiency => "Material Efficiency",
            Criterion::CostEffectiveness => "Cost Effectiveness",
            Criterion::ManufacturingFeasibility => "Manufacturing Feasibility",
            Criterion::EnvironmentalImpact => "Environmental Impact",
            Criterion::IstaCompliance => "ISTA Compliance",
            Criterion::DropResistance => "Drop Resistance",
            Criterion::VibrationResistance => "Vibration Resistance",
        }
    }

    /// Scenario whose safety factor drives this criterion, if any
    fn driving_test(&self) -> Option<TestType> {
        match self {
            Criterion::DropResistance => Some(TestType::Drop),
            Criterion::VibrationResistance => Some(TestType::Vibration),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub score: f64,
    pub target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceProfile {
    pub scores: Vec<CriterionScore>,
}

impl PerformanceProfile {
    /// Score `results`.
    ///
    /// With `optimization_applied` each target is the score lifted by 1.5
    /// (capped at 8.5); otherwise every target is 8.2.
    ///
    /// # Errors
    ///
    /// `NoResults` when `results` is empty.
    pub fn score<R: Rng + ?Sized>(
        results: &[&TestResult],
        optimization_applied: bool,
        rng: &mut R,
    ) -> SimResult<Self> {
        if results.is_empty() {
            return Err(SimError::NoResults);
        }

        let passed = results.iter().filter(|r| r.passes()).count();
        let any_failed = passed < results.len();
        let compliance_rate = passed as f64 / results.len() as f64;
        let baseline = if any_failed {
            BASELINE_WITH_FAILURES
        } else {
            BASELINE_ALL_PASS
        };

        let scores = Criterion::ALL
            .iter()
            .map(|&criterion| {
                let driving = criterion
                    .driving_test()
                    .and_then(|t| results.iter().find(|r| r.test_type == t));
                let raw = match (criterion, driving) {
                    (_, Some(result)) => (result.safety_factor * RESISTANCE_PER_SAFETY).min(MAX_SCORE),
                    (Criterion::IstaCompliance, None) => compliance_rate * MAX_SCORE,
                    _ => baseline + rng.gen_range(-BASELINE_JITTER..BASELINE_JITTER),
                };
                let score = raw.clamp(0.0, MAX_SCORE);
                let target = if optimization_applied {
                    (score + OPTIMIZED_TARGET_LIFT).min(OPTIMIZED_TARGET_CAP)
                } else {
                    FLAT_TARGET
                };
                CriterionScore {
                    criterion,
                    score,
                    target,
                }
            })
            .collect();

        Ok(PerformanceProfile { scores })
    }

    /// Score of one criterion
    pub fn get(&self, criterion: Criterion) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.criterion == criterion)
            .map(|s| s.score)
    }

    /// Mean score across all criteria
    pub fn mean(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().map(|s| s.score).sum::<f64>() / self.scores.len() as f64
    }
}
