//! # Stress / Safety Estimation
//!
//! Maps a scenario configuration and a material to a peak stress, a safety
//! factor and a compliance verdict. Each scenario lives in its own module and
//! exposes a `calculate` function; [`estimate`] dispatches on [`TestConfig`].
//!
//! All estimates scale from the material's yield strength in MPa (the base
//! stress), and `safety_factor = base_stress / max_stress`. A scenario passes
//! only when the safety factor is strictly greater than [`PASS_THRESHOLD`].
//!
//! ## Available Calculations
//!
//! - [`drop`] - free-fall impact
//! - [`vibration`] - vibration table sweep (runs the response synthesizer)
//! - [`transport`] - road trip (runs the transport simulator)
//!
//! ## Example
//!
//! ```rust
//! use pack_core::calculations::{estimate, Verdict};
//! use pack_core::materials::MaterialCatalog;
//! use pack_core::scenarios::{DropConfig, TestConfig};
//! use pack_core::simulation::rng;
//!
//! let catalog = MaterialCatalog::with_builtins();
//! let config = TestConfig::Drop(DropConfig::new(1.5));
//! let result = estimate(&config, catalog.get("PP").unwrap(), &mut rng::seeded(1)).unwrap();
//!
//! assert!((result.max_stress_mpa - 14.70).abs() < 0.01);
//! assert_eq!(result.compliance, Verdict::Pass);
//! ```

pub mod drop;
pub mod transport;
pub mod vibration;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{SimError, SimResult};
use crate::materials::Material;
use crate::scenarios::{
    DropConfig, RouteType, TestConfig, TestType, TransportConfig, VibrationConfig,
};
use crate::simulation::{TransportTrace, VibrationResponse};

/// Minimum safety factor (exclusive) for a PASS verdict
pub const PASS_THRESHOLD: f64 = 2.0;

/// Compliance verdict of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    /// PASS iff `safety_factor > 2.0`
    pub fn from_safety_factor(safety_factor: f64) -> Self {
        if safety_factor > PASS_THRESHOLD {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("PASS"),
            Verdict::Fail => f.write_str("FAIL"),
        }
    }
}

/// Scenario-specific outputs carried alongside the common figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestDetails {
    Drop {
        /// Impact velocity (m/s)
        impact_velocity_m_s: f64,
        /// Kinetic energy of a 1 kg package at impact (J)
        kinetic_energy_j: f64,
    },
    Vibration {
        response: VibrationResponse,
    },
    Transport {
        /// Peak g-force over the trip
        max_g_force: f64,
        trace: TransportTrace,
    },
}

/// Outcome of one scenario estimate.
///
/// ## JSON Example
///
/// ```json
/// {
///   "test_type": "drop",
///   "max_stress_mpa": 14.697,
///   "safety_factor": 2.041,
///   "compliance": "PASS",
///   "details": { "kind": "drop", "impact_velocity_m_s": 5.425, "kinetic_energy_j": 14.715 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub test_type: TestType,
    /// Estimated peak stress (MPa)
    pub max_stress_mpa: f64,
    /// Base stress / peak stress
    pub safety_factor: f64,
    pub compliance: Verdict,
    pub details: TestDetails,
}

impl TestResult {
    /// Build a result from the base and peak stress, deriving the safety factor and verdict.
    pub fn from_stresses(
        test_type: TestType,
        base_stress_mpa: f64,
        max_stress_mpa: f64,
        details: TestDetails,
    ) -> Self {
        let safety_factor = base_stress_mpa / max_stress_mpa;
        TestResult {
            test_type,
            max_stress_mpa,
            safety_factor,
            compliance: Verdict::from_safety_factor(safety_factor),
            details,
        }
    }

    /// Whether the scenario passed
    pub fn passes(&self) -> bool {
        self.compliance.is_pass()
    }

    /// Raise the safety factor to at least `floor` and mark the result PASS.
    pub fn force_pass(&mut self, floor: f64) {
        self.safety_factor = self.safety_factor.max(floor);
        self.compliance = Verdict::Pass;
    }

    /// Impact velocity for drop results
    pub fn impact_velocity(&self) -> Option<f64> {
        match &self.details {
            TestDetails::Drop { impact_velocity_m_s, .. } => Some(*impact_velocity_m_s),
            _ => None,
        }
    }

    /// Peak g-force for transport results
    pub fn max_g_force(&self) -> Option<f64> {
        match &self.details {
            TestDetails::Transport { max_g_force, .. } => Some(*max_g_force),
            _ => None,
        }
    }
}

/// Estimate one configured scenario against `material`.
///
/// Vibration and transport estimates draw from `rng`.
pub fn estimate<R: Rng + ?Sized>(
    config: &TestConfig,
    material: &Material,
    rng: &mut R,
) -> SimResult<TestResult> {
    let result = match config {
        TestConfig::Drop(c) => drop::calculate(c, material)?,
        TestConfig::Vibration(c) => vibration::calculate(c, material, rng)?,
        TestConfig::Transport(c) => transport::calculate(c, material, rng)?,
    };
    log::debug!(
        "{} on {}: max {:.2} MPa, SF {:.2} -> {}",
        result.test_type,
        material.name,
        result.max_stress_mpa,
        result.safety_factor,
        result.compliance
    );
    Ok(result)
}

/// Estimate a scenario named by text with loosely-typed parameters.
///
/// This is the entry point for callers that speak JSON (assistants, scripts).
/// Recognised parameters and their defaults when absent:
///
/// | Test        | Parameter         | Default                  |
/// |-------------|-------------------|--------------------------|
/// | `drop`      | `height_m`        | 1.0                      |
/// | `vibration` | `g_force`         | 1.15                     |
/// | `vibration` | `frequency_range` | "5-200 Hz"               |
/// | `vibration` | `stacking_load`   | 0.0                      |
/// | `transport` | `distance_km`     | 1000                     |
/// | `transport` | `route_type`      | "Mixed (City + Highway)" |
///
/// # Errors
///
/// `UnknownTestType` for an unsupported name, `InvalidParameter` for a
/// parameter of the wrong JSON type or an out-of-range value.
pub fn estimate_named<R: Rng + ?Sized>(
    test_type: &str,
    params: &Value,
    material: &Material,
    rng: &mut R,
) -> SimResult<TestResult> {
    let config = config_from_params(test_type.parse()?, params)?;
    estimate(&config, material, rng)
}

/// Build a [`TestConfig`] from loosely-typed parameters (see [`estimate_named`]).
pub fn config_from_params(test_type: TestType, params: &Value) -> SimResult<TestConfig> {
    let config = match test_type {
        TestType::Drop => TestConfig::Drop(DropConfig::new(number_param(params, "height_m", 1.0)?)),
        TestType::Vibration => TestConfig::Vibration(VibrationConfig::new(
            number_param(params, "g_force", 1.15)?,
            text_param(params, "frequency_range", "5-200 Hz")?,
            number_param(params, "stacking_load", 0.0)?,
        )),
        TestType::Transport => {
            let distance = match params.get("distance_km") {
                None => 1000,
                Some(v) => v
                    .as_u64()
                    .and_then(|d| u32::try_from(d).ok())
                    .ok_or_else(|| {
                        SimError::invalid_parameter(
                            "distance_km",
                            v.to_string(),
                            "Distance must be a positive whole number of kilometres",
                        )
                    })?,
            };
            TestConfig::Transport(TransportConfig::new(
                distance,
                text_param(params, "route_type", RouteType::Mixed.label())?,
            ))
        }
    };
    config.validate()?;
    Ok(config)
}

fn number_param(params: &Value, key: &str, default: f64) -> SimResult<f64> {
    match params.get(key) {
        None => Ok(default),
        Some(v) => v.as_f64().ok_or_else(|| {
            SimError::invalid_parameter(key, v.to_string(), "Expected a number")
        }),
    }
}

fn text_param<'a>(params: &'a Value, key: &str, default: &'a str) -> SimResult<&'a str> {
    match params.get(key) {
        None => Ok(default),
        Some(v) => v
            .as_str()
            .ok_or_else(|| SimError::invalid_parameter(key, v.to_string(), "Expected a string")),
    }
}
