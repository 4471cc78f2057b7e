//! # Drop Test Calculation
//!
//! Free-fall impact of a package dropped from a given height.
//!
//! ## Assumptions
//!
//! - 1 kg reference mass for the kinetic energy figure
//! - Peak stress grows with the square root of height, normalised to a 1 m drop
//! - Orientation does not change the estimate (it is reported for context)
//!
//! Because the peak stress scales from the same base stress the safety factor
//! divides by, the drop safety factor reduces to `1 / (0.4 · √h)` for every
//! material.

use crate::errors::SimResult;
use crate::materials::Material;
use crate::scenarios::{DropConfig, TestType};
use crate::units::STANDARD_GRAVITY;

use super::{TestDetails, TestResult};

/// Peak stress at a 1 m drop, as a fraction of yield
const STRESS_RATIO: f64 = 0.4;

/// Drop height the stress ratio is normalised to (m)
const REFERENCE_HEIGHT_M: f64 = 1.0;

/// Reference package mass (kg)
const REFERENCE_MASS_KG: f64 = 1.0;

/// Impact velocity after free fall from `height_m`: `v = √(2gh)`
pub fn impact_velocity(height_m: f64) -> f64 {
    (2.0 * STANDARD_GRAVITY * height_m).sqrt()
}

/// Estimate a drop test.
pub fn calculate(config: &DropConfig, material: &Material) -> SimResult<TestResult> {
    config.validate()?;

    let base_stress = material.yield_strength_mpa().0;

    let velocity = impact_velocity(config.height_m);
    let kinetic_energy = 0.5 * REFERENCE_MASS_KG * velocity.powi(2);

    let height_factor = (config.height_m / REFERENCE_HEIGHT_M).sqrt();
    let max_stress = base_stress * STRESS_RATIO * height_factor;

    Ok(TestResult::from_stresses(
        TestType::Drop,
        base_stress,
        max_stress,
        TestDetails::Drop {
            impact_velocity_m_s: velocity,
            kinetic_energy_j: kinetic_energy,
        },
    ))
}
