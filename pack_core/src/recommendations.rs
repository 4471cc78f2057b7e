//! # Recommendation Engine
//!
//! Turns failing scenario results into corrective actions:
//!
//! - **Structural changes** for badly failing scenarios (safety factor < 1.5),
//!   a fixed list per scenario type. Lists from several scenarios are
//!   concatenated as-is, duplicates included.
//! - **Material property suggestions** for marginal failures
//!   (1.5 ≤ safety factor < 2.0). The suggestion set is replaced wholesale by
//!   each qualifying scenario, so the last one processed wins.
//! - **An optimized material** when two or more scenarios failed, scaled so the
//!   weakest scenario would reach a safety factor of 2.5.
//!
//! Nothing here mutates the catalog; adopting the optimized material is the
//! pipeline's job.
//!
//! ## Example
//!
//! ```rust
//! use pack_core::calculations::estimate;
//! use pack_core::materials::MaterialCatalog;
//! use pack_core::recommendations::recommend;
//! use pack_core::scenarios::{DropConfig, TestConfig};
//! use pack_core::simulation::rng;
//!
//! let catalog = MaterialCatalog::with_builtins();
//! let pp = catalog.get("PP").unwrap();
//! let failed = estimate(&TestConfig::Drop(DropConfig::new(4.0)), pp, &mut rng::seeded(1)).unwrap();
//!
//! let rec = recommend(&[&failed], pp);
//! assert_eq!(rec.structural_changes.len(), 3);
//! assert!(rec.new_material.is_none());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calculations::TestResult;
use crate::materials::Material;
use crate::scenarios::TestType;

/// Below this safety factor a scenario calls for structural changes
pub const STRUCTURAL_THRESHOLD: f64 = 1.5;

/// Upper bound (exclusive) of the band that calls for material tuning
pub const MATERIAL_TUNING_CEILING: f64 = 2.0;

/// Safety factor the material-tuning suggestion aims for
const TUNING_TARGET_SF: f64 = 2.1;

/// Safety factor the optimized material is scaled to deliver
pub const OPTIMIZATION_TARGET_SF: f64 = 2.5;

/// Property key of the strength suggestion
pub const YIELD_STRENGTH_INCREASE: &str = "yield_strength_increase";
pub const DENSITY_OPTIMIZATION: &str = "density_optimization";
pub const MODULUS_ADJUSTMENT: &str = "modulus_adjustment";

const DENSITY_SUGGESTION: &str = "Reduce by 5-10% while maintaining strength";
const MODULUS_SUGGESTION: &str = "Increase by 10-15% for improved stiffness";

const OPTIMIZED_DENSITY_SCALE: f64 = 0.95;
const OPTIMIZED_MODULUS_SCALE: f64 = 0.8;
const OPTIMIZED_COST_SCALE: f64 = 1.3;
const OPTIMIZED_DESCRIPTION: &str =
    "Optimized material with enhanced performance characteristics";

/// Canned structural actions for a scenario type
pub fn structural_changes_for(test_type: TestType) -> &'static [&'static str] {
    match test_type {
        TestType::Drop => &[
            "Implement corner reinforcement with radius optimization (R=2-3mm)",
            "Increase wall thickness by 15-20% in high-stress regions",
            "Add internal ribbing structure for improved load distribution",
        ],
        TestType::Vibration => &[
            "Design internal bracing system for modal frequency shift",
            "Integrate vibration dampening elements in critical areas",
            "Optimize geometry for reduced stress concentration factors",
        ],
        TestType::Transport => &[
            "Enhance shock absorption system with graduated stiffness",
            "Implement multi-layer protection with energy dissipation",
            "Add stress distribution channels for load path optimization",
        ],
    }
}

/// Corrective actions derived from a set of failing results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Structural actions in the order the failing scenarios were processed
    pub structural_changes: Vec<String>,
    /// Property name → suggested change
    pub material_optimization: BTreeMap<String, String>,
    /// Synthesized material, present only when two or more scenarios failed
    pub new_material: Option<Material>,
}

impl Recommendation {
    /// Whether nothing was recommended
    pub fn is_empty(&self) -> bool {
        self.structural_changes.is_empty()
            && self.material_optimization.is_empty()
            && self.new_material.is_none()
    }
}

/// Which recommendation the user chose to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationChoice {
    /// Apply the structural changes
    StructuralModifications,
    /// Apply the material property suggestions
    MaterialEnhancement,
    /// Adopt the synthesized material
    OptimizedMaterial,
}

impl OptimizationChoice {
    pub const ALL: [OptimizationChoice; 3] = [
        OptimizationChoice::StructuralModifications,
        OptimizationChoice::MaterialEnhancement,
        OptimizationChoice::OptimizedMaterial,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            OptimizationChoice::StructuralModifications => "Structural Modifications",
            OptimizationChoice::MaterialEnhancement => "Material Enhancement",
            OptimizationChoice::OptimizedMaterial => "Optimized Material",
        }
    }
}

/// Strength increase (fraction) that lifts `safety_factor` to 2.1
pub fn strength_increase(safety_factor: f64) -> f64 {
    TUNING_TARGET_SF / safety_factor - 1.0
}

/// Scale `material` so a scenario at `min_safety_factor` would reach 2.5.
pub fn optimize_material(material: &Material, min_safety_factor: f64) -> Material {
    let improvement = OPTIMIZATION_TARGET_SF / min_safety_factor;
    Material {
        name: format!("Optimized {}", material.name),
        density_kg_m3: material.density_kg_m3 * OPTIMIZED_DENSITY_SCALE,
        youngs_modulus_pa: material.youngs_modulus_pa * improvement * OPTIMIZED_MODULUS_SCALE,
        poisson_ratio: material.poisson_ratio,
        yield_strength_pa: material.yield_strength_pa * improvement,
        ultimate_strength_pa: material.ultimate_strength_pa * improvement,
        cost_per_kg: material.cost_per_kg * OPTIMIZED_COST_SCALE,
        description: OPTIMIZED_DESCRIPTION.to_string(),
    }
}

/// Derive recommendations from `failed` results, processed in slice order.
///
/// Callers pass only failing results; the engine does not re-check verdicts.
pub fn recommend(failed: &[&TestResult], material: &Material) -> Recommendation {
    let mut rec = Recommendation::default();

    for result in failed {
        let sf = result.safety_factor;
        if sf < STRUCTURAL_THRESHOLD {
            rec.structural_changes.extend(
                structural_changes_for(result.test_type)
                    .iter()
                    .map(|s| s.to_string()),
            );
        } else if sf < MATERIAL_TUNING_CEILING {
            let increase = strength_increase(sf);
            rec.material_optimization = BTreeMap::from([
                (
                    YIELD_STRENGTH_INCREASE.to_string(),
                    format!("{:.1}%", increase * 100.0),
                ),
                (DENSITY_OPTIMIZATION.to_string(), DENSITY_SUGGESTION.to_string()),
                (MODULUS_ADJUSTMENT.to_string(), MODULUS_SUGGESTION.to_string()),
            ]);
        }
    }

    if failed.len() > 1 {
        let min_sf = failed
            .iter()
            .map(|r| r.safety_factor)
            .fold(f64::INFINITY, f64::min);
        rec.new_material = Some(optimize_material(material, min_sf));
    }

    log::debug!(
        "{} failing tests -> {} structural changes, {} material suggestions, optimized material: {}",
        failed.len(),
        rec.structural_changes.len(),
        rec.material_optimization.len(),
        rec.new_material.is_some()
    );

    rec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::TestDetails;
    use crate::materials::MaterialCatalog;
    use approx::assert_relative_eq;

    fn failing(test_type: TestType, safety_factor: f64) -> TestResult {
        let details = TestDetails::Drop {
            impact_velocity_m_s: 0.0,
            kinetic_energy_j: 0.0,
        };
        TestResult::from_stresses(test_type, 30.0, 30.0 / safety_factor, details)
    }

    fn pp() -> Material {
        MaterialCatalog::with_builtins().get("PP").unwrap().clone()
    }

    #[test]
    fn test_structural_changes_below_one_and_a_half() {
        let rec = recommend(&[&failing(TestType::Vibration, 1.2)], &pp());
        assert_eq!(
            rec.structural_changes,
            structural_changes_for(TestType::Vibration).to_vec()
        );
        assert!(rec.material_optimization.is_empty());
        assert!(rec.new_material.is_none());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let rec = recommend(
            &[&failing(TestType::Drop, 1.1), &failing(TestType::Drop, 1.3)],
            &pp(),
        );
        assert_eq!(rec.structural_changes.len(), 6);
        assert_eq!(rec.structural_changes[0], rec.structural_changes[3]);
    }

    #[test]
    fn test_material_suggestion_band() {
        let rec = recommend(&[&failing(TestType::Drop, 1.75)], &pp());
        assert!(rec.structural_changes.is_empty());
        // 2.1 / 1.75 - 1 = 20%
        assert_eq!(rec.material_optimization[YIELD_STRENGTH_INCREASE], "20.0%");
        assert_eq!(rec.material_optimization[DENSITY_OPTIMIZATION], DENSITY_SUGGESTION);
        assert_eq!(rec.material_optimization[MODULUS_ADJUSTMENT], MODULUS_SUGGESTION);
    }

    #[test]
    fn test_last_marginal_failure_wins() {
        let rec = recommend(
            &[&failing(TestType::Drop, 1.5), &failing(TestType::Vibration, 1.75)],
            &pp(),
        );
        assert_eq!(rec.material_optimization[YIELD_STRENGTH_INCREASE], "20.0%");
        assert_eq!(rec.material_optimization.len(), 3);
    }

    #[test]
    fn test_exact_threshold_matches_neither_band() {
        let rec = recommend(&[&failing(TestType::Drop, 2.0)], &pp());
        assert!(rec.is_empty());
    }

    #[test]
    fn test_optimized_material_from_two_failures() {
        let original = pp();
        let rec = recommend(
            &[&failing(TestType::Drop, 1.2), &failing(TestType::Vibration, 1.8)],
            &original,
        );

        let improvement = 2.5 / 1.2;
        let optimized = rec.new_material.expect("two failures synthesize a material");
        assert_relative_eq!(improvement, 2.0833, epsilon = 1e-4);
        assert_eq!(optimized.name, "Optimized Polypropylene");
        assert_relative_eq!(optimized.yield_strength_pa, 30e6 * improvement, max_relative = 1e-12);
        assert_relative_eq!(optimized.ultimate_strength_pa, 38e6 * improvement, max_relative = 1e-12);
        assert_relative_eq!(optimized.youngs_modulus_pa, 1300e6 * improvement * 0.8, max_relative = 1e-12);
        assert_relative_eq!(optimized.density_kg_m3, 855.0, epsilon = 1e-9);
        assert_relative_eq!(optimized.cost_per_kg, 1.56, epsilon = 1e-9);
        assert_eq!(optimized.poisson_ratio, original.poisson_ratio);
        assert!(optimized.validate().is_ok());

        // Structural list from the 1.2 failure, suggestion set from the 1.8 one
        assert_eq!(rec.structural_changes.len(), 3);
        assert_eq!(rec.material_optimization[YIELD_STRENGTH_INCREASE], "16.7%");
    }

    #[test]
    fn test_choice_serialization() {
        let json = serde_json::to_string(&OptimizationChoice::OptimizedMaterial).unwrap();
        assert_eq!(json, "\"optimized_material\"");
    }
}
