//! # Transport Calculation
//!
//! Simulates the configured trip and estimates peak stress from the trip's
//! peak g-force, normalised to a 2 g reference. Each run draws a fresh trace,
//! so repeated estimates of one configuration differ in their numbers.

use rand::Rng;

use crate::errors::SimResult;
use crate::materials::Material;
use crate::scenarios::{TestType, TransportConfig};
use crate::simulation::simulate_transport;

use super::{TestDetails, TestResult};

/// Peak stress at the reference g-force, as a fraction of yield
const STRESS_RATIO: f64 = 0.15;

/// Reference peak g-force
const REFERENCE_G: f64 = 2.0;

/// Estimate a transport simulation.
pub fn calculate<R: Rng + ?Sized>(
    config: &TransportConfig,
    material: &Material,
    rng: &mut R,
) -> SimResult<TestResult> {
    config.validate()?;

    let trace = simulate_transport(config.distance_km, config.route_type, rng)?;
    let max_g_force = trace.max_g_force;

    let base_stress = material.yield_strength_mpa().0;
    let max_stress = base_stress * STRESS_RATIO * (max_g_force / REFERENCE_G);

    Ok(TestResult::from_stresses(
        TestType::Transport,
        base_stress,
        max_stress,
        TestDetails::Transport { max_g_force, trace },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::MaterialCatalog;
    use crate::scenarios::RouteType;
    use crate::simulation::rng;
    use approx::assert_relative_eq;

    #[test]
    fn test_stress_follows_peak_g() {
        let catalog = MaterialCatalog::with_builtins();
        let aluminum = catalog.get("Aluminum").unwrap();
        let config = TransportConfig::new(2500, "Off-road/Rural");
        let result = calculate(&config, aluminum, &mut rng::seeded(31)).unwrap();

        let max_g = result.max_g_force().unwrap();
        assert_relative_eq!(result.max_stress_mpa, 100.0 * 0.15 * max_g / 2.0, epsilon = 1e-9);
        assert_relative_eq!(result.safety_factor, 2.0 / (0.15 * max_g), epsilon = 1e-9);
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let catalog = MaterialCatalog::with_builtins();
        let pp = catalog.get("PP").unwrap();
        let config = TransportConfig {
            distance_km: 150,
            route_type: RouteType::PrimarilyCity,
        };
        let a = calculate(&config, pp, &mut rng::seeded(32)).unwrap();
        let b = calculate(&config, pp, &mut rng::seeded(32)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_trace_attached() {
        let catalog = MaterialCatalog::with_builtins();
        let config = TransportConfig::new(100, "Primarily Highway");
        let result = calculate(&config, catalog.get("PET").unwrap(), &mut rng::seeded(33)).unwrap();
        match result.details {
            TestDetails::Transport { trace, .. } => assert_eq!(trace.len(), 200),
            other => panic!("unexpected details {:?}", other),
        }
    }
}
