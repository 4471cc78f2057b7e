//! # Unit Types
//!
//! Lightweight newtype wrappers for the SI quantities the engine moves between
//! material records (Pa), stress estimates (MPa) and the transport trace
//! (g, N). They serialize as bare numbers.
//!
//! ## Example
//!
//! ```rust
//! use pack_core::units::{Megapascals, Pascals};
//!
//! let yield_strength = Pascals(30e6);
//! let mpa: Megapascals = yield_strength.into();
//! assert_eq!(mpa.0, 30.0);
//! ```

use serde::{Deserialize, Serialize};

/// Standard gravity used throughout the engine (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.81;

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in pascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

/// Stress in megapascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megapascals(pub f64);

impl From<Pascals> for Megapascals {
    fn from(pa: Pascals) -> Self {
        Megapascals(pa.0 / 1e6)
    }
}

impl From<Megapascals> for Pascals {
    fn from(mpa: Megapascals) -> Self {
        Pascals(mpa.0 * 1e6)
    }
}

// ============================================================================
// Acceleration / Force Units
// ============================================================================

/// Acceleration in multiples of standard gravity
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GForce(pub f64);

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

impl GForce {
    /// Force on a reference mass in kilograms
    pub fn force_on(self, mass_kg: f64) -> Newtons {
        Newtons(self.0 * STANDARD_GRAVITY * mass_kg)
    }
}

impl Megapascals {
    /// Get the raw f64 value
    pub fn value(self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pascals_to_megapascals() {
        let mpa: Megapascals = Pascals(55e6).into();
        assert_relative_eq!(mpa.0, 55.0);
        let back: Pascals = mpa.into();
        assert_relative_eq!(back.0, 55e6);
    }

    #[test]
    fn test_gforce_on_unit_mass() {
        assert_relative_eq!(GForce(1.0).force_on(1.0).0, STANDARD_GRAVITY);
        assert_relative_eq!(GForce(2.5).force_on(2.0).0, 5.0 * STANDARD_GRAVITY);
    }

    #[test]
    fn test_megapascals_value() {
        let mpa: Megapascals = Pascals(1.15e6).into();
        assert_relative_eq!(mpa.value(), 1.15);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Megapascals(14.5)).unwrap();
        assert_eq!(json, "14.5");
    }
}
