//! # Vibration Test Calculation
//!
//! Runs the response synthesizer over the configured band and estimates peak
//! stress from the RMS input level, normalised to the 1.15 g reference
//! profile. The response curve is attached to the result for reporting; it
//! does not enter the stress figure.

use rand::Rng;

use crate::errors::SimResult;
use crate::materials::Material;
use crate::scenarios::{TestType, VibrationConfig};
use crate::simulation::synthesize_vibration;

use super::{TestDetails, TestResult};

/// Peak stress at the reference level, as a fraction of yield
const STRESS_RATIO: f64 = 0.2;

/// Reference RMS level (g)
pub const REFERENCE_G_RMS: f64 = 1.15;

/// Estimate a vibration test.
pub fn calculate<R: Rng + ?Sized>(
    config: &VibrationConfig,
    material: &Material,
    rng: &mut R,
) -> SimResult<TestResult> {
    config.validate()?;

    let response = synthesize_vibration(config.g_force_rms, config.frequency_range, rng)?;

    let base_stress = material.yield_strength_mpa().0;
    let max_stress = base_stress * STRESS_RATIO * (config.g_force_rms / REFERENCE_G_RMS);

    Ok(TestResult::from_stresses(
        TestType::Vibration,
        base_stress,
        max_stress,
        TestDetails::Vibration { response },
    ))
}
