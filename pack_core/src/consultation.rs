//! # Consultation Context
//!
//! Read-only snapshot of a session handed to an external advisory layer
//! (a chat assistant, a report generator). Nothing here produces prose; the
//! [`DesignAssessment`] carries the figures and classifications such a layer
//! phrases.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::TestResult;
use crate::errors::{SimError, SimResult};
use crate::materials::Material;

/// Density below which a material counts as light enough for packaging (kg/m³)
pub const OPTIMAL_DENSITY_LIMIT: f64 = 1200.0;

/// Cost below which a material counts as economical ($/kg)
pub const ECONOMICAL_COST_LIMIT: f64 = 2.0;

/// Overall structural standing, from the minimum safety factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralTier {
    Critical,
    Marginal,
    Good,
    Excellent,
}

impl StructuralTier {
    /// `> 3.0` Excellent, `> 2.0` Good, `> 1.5` Marginal, else Critical
    pub fn from_safety_factor(min_safety_factor: f64) -> Self {
        if min_safety_factor > 3.0 {
            StructuralTier::Excellent
        } else if min_safety_factor > 2.0 {
            StructuralTier::Good
        } else if min_safety_factor > 1.5 {
            StructuralTier::Marginal
        } else {
            StructuralTier::Critical
        }
    }
}

impl fmt::Display for StructuralTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StructuralTier::Critical => "Critical",
            StructuralTier::Marginal => "Marginal",
            StructuralTier::Good => "Good",
            StructuralTier::Excellent => "Excellent",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityClass {
    Optimal,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostClass {
    Economical,
    Premium,
}

/// Deterministic figures describing how a material copes with a result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignAssessment {
    pub max_stress_mpa: f64,
    pub min_safety_factor: f64,
    /// Peak stress as a percentage of yield
    pub utilization_percent: f64,
    /// Yield (MPa) per density, ×1000
    pub strength_to_weight: f64,
    pub structural_tier: StructuralTier,
    pub density_class: DensityClass,
    pub cost_class: CostClass,
    pub failing_tests: usize,
}

impl DesignAssessment {
    /// Assess `results` against `material`.
    ///
    /// # Errors
    ///
    /// `NoResults` when `results` is empty.
    pub fn assess(material: &Material, results: &[&TestResult]) -> SimResult<Self> {
        if results.is_empty() {
            return Err(SimError::NoResults);
        }

        let max_stress_mpa = results
            .iter()
            .map(|r| r.max_stress_mpa)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_safety_factor = results
            .iter()
            .map(|r| r.safety_factor)
            .fold(f64::INFINITY, f64::min);

        Ok(DesignAssessment {
            max_stress_mpa,
            min_safety_factor,
            utilization_percent: max_stress_mpa / material.yield_strength_mpa().value() * 100.0,
            strength_to_weight: material.strength_to_weight(),
            structural_tier: StructuralTier::from_safety_factor(min_safety_factor),
            density_class: if material.density_kg_m3 < OPTIMAL_DENSITY_LIMIT {
                DensityClass::Optimal
            } else {
                DensityClass::Heavy
            },
            cost_class: if material.cost_per_kg < ECONOMICAL_COST_LIMIT {
                CostClass::Economical
            } else {
                CostClass::Premium
            },
            failing_tests: results.iter().filter(|r| !r.passes()).count(),
        })
    }
}

/// Everything an advisory layer may read about the current session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationContext {
    pub material_key: String,
    pub material: Material,
    /// Latest results in configured order
    pub results: Vec<TestResult>,
    /// `None` until at least one scenario has run
    pub assessment: Option<DesignAssessment>,
    pub optimization_applied: bool,
}

impl ConsultationContext {
    pub fn new(
        material_key: impl Into<String>,
        material: &Material,
        results: &[&TestResult],
        optimization_applied: bool,
    ) -> Self {
        ConsultationContext {
            material_key: material_key.into(),
            material: material.clone(),
            results: results.iter().map(|r| (*r).clone()).collect(),
            assessment: DesignAssessment::assess(material, results).ok(),
            optimization_applied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{TestDetails, Verdict};
    use crate::materials::MaterialCatalog;
    use crate::scenarios::TestType;
    use approx::assert_relative_eq;

    fn result(test_type: TestType, max_stress: f64, base: f64) -> TestResult {
        TestResult::from_stresses(
            test_type,
            base,
            max_stress,
            TestDetails::Drop {
                impact_velocity_m_s: 0.0,
                kinetic_energy_j: 0.0,
            },
        )
    }

    #[test]
    fn test_tiers() {
        assert_eq!(StructuralTier::from_safety_factor(3.5), StructuralTier::Excellent);
        assert_eq!(StructuralTier::from_safety_factor(3.0), StructuralTier::Good);
        assert_eq!(StructuralTier::from_safety_factor(2.0), StructuralTier::Marginal);
        assert_eq!(StructuralTier::from_safety_factor(1.5), StructuralTier::Critical);
        assert!(StructuralTier::Good > StructuralTier::Marginal);
    }

    #[test]
    fn test_assessment_for_pp() {
        let catalog = MaterialCatalog::with_builtins();
        let pp = catalog.get("PP").unwrap();
        let drop = result(TestType::Drop, 12.0, 30.0);
        let vib = result(TestType::Vibration, 6.0, 30.0);

        let a = DesignAssessment::assess(pp, &[&drop, &vib]).unwrap();
        assert_relative_eq!(a.max_stress_mpa, 12.0);
        assert_relative_eq!(a.min_safety_factor, 2.5);
        assert_relative_eq!(a.utilization_percent, 40.0, epsilon = 1e-9);
        // 30 / 900 * 1000
        assert_relative_eq!(a.strength_to_weight, 33.333, epsilon = 1e-3);
        assert_eq!(a.structural_tier, StructuralTier::Good);
        assert_eq!(a.density_class, DensityClass::Optimal);
        assert_eq!(a.cost_class, CostClass::Economical);
        assert_eq!(a.failing_tests, 0);
    }

    #[test]
    fn test_assessment_for_aluminum() {
        let catalog = MaterialCatalog::with_builtins();
        let al = catalog.get("Aluminum").unwrap();
        let drop = result(TestType::Drop, 80.0, 100.0);
        assert_eq!(drop.compliance, Verdict::Fail);

        let a = DesignAssessment::assess(al, &[&drop]).unwrap();
        assert_eq!(a.structural_tier, StructuralTier::Critical);
        assert_eq!(a.density_class, DensityClass::Heavy);
        assert_eq!(a.cost_class, CostClass::Premium);
        assert_eq!(a.failing_tests, 1);
    }

    #[test]
    fn test_empty_results() {
        let catalog = MaterialCatalog::with_builtins();
        let pp = catalog.get("PP").unwrap();
        assert_eq!(DesignAssessment::assess(pp, &[]).unwrap_err(), SimError::NoResults);

        let ctx = ConsultationContext::new("PP", pp, &[], false);
        assert!(ctx.assessment.is_none());
        assert!(ctx.results.is_empty());
    }
}
