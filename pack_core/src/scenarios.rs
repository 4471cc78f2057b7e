//! # Test Scenarios
//!
//! Configuration records for the three mechanical stress scenarios a design
//! can be checked against. Each scenario follows the same pattern as the rest
//! of the crate: a JSON-serializable input struct with a `validate()` method.
//!
//! Route and frequency-band labels are free text at the boundary. Labels the
//! engine does not recognise degrade to a default (Mixed route, widest band)
//! instead of failing.
//!
//! ## Example
//!
//! ```rust
//! use pack_core::scenarios::{DropConfig, TestConfig, TestType, TransportConfig};
//!
//! let tests = vec![
//!     TestConfig::Drop(DropConfig::default()),
//!     TestConfig::Transport(TransportConfig::new(1200, "Primarily Highway")),
//! ];
//! assert_eq!(tests[1].test_type(), TestType::Transport);
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{SimError, SimResult};
use crate::units::STANDARD_GRAVITY;

// ============================================================================
// Test Type
// ============================================================================

/// The supported scenario kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    /// Free-fall impact
    Drop,
    /// Random vibration (table test)
    Vibration,
    /// Long-haul road transport
    #[serde(alias = "live_transport")]
    Transport,
}

impl TestType {
    /// All test types in presentation order
    pub const ALL: [TestType; 3] = [TestType::Drop, TestType::Vibration, TestType::Transport];

    /// Machine key ("drop", "vibration", "transport")
    pub fn key(&self) -> &'static str {
        match self {
            TestType::Drop => "drop",
            TestType::Vibration => "vibration",
            TestType::Transport => "transport",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            TestType::Drop => "Drop Test",
            TestType::Vibration => "Vibration Test",
            TestType::Transport => "Transport Simulation",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TestType {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "drop" => Ok(TestType::Drop),
            "vibration" => Ok(TestType::Vibration),
            "transport" | "live_transport" => Ok(TestType::Transport),
            _ => Err(SimError::unknown_test_type(s)),
        }
    }
}

// ============================================================================
// Enumerated Labels
// ============================================================================

/// Impact orientation for a drop test. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DropOrientation {
    Corner,
    Edge,
    #[serde(rename = "Face-Front")]
    FaceFront,
    #[serde(rename = "Face-Back")]
    FaceBack,
    #[serde(rename = "Face-Side")]
    FaceSide,
    #[serde(rename = "Face-Top")]
    FaceTop,
}

impl DropOrientation {
    /// All orientations for UI selection
    pub const ALL: [DropOrientation; 6] = [
        DropOrientation::Corner,
        DropOrientation::Edge,
        DropOrientation::FaceFront,
        DropOrientation::FaceBack,
        DropOrientation::FaceSide,
        DropOrientation::FaceTop,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            DropOrientation::Corner => "Corner",
            DropOrientation::Edge => "Edge",
            DropOrientation::FaceFront => "Face-Front",
            DropOrientation::FaceBack => "Face-Back",
            DropOrientation::FaceSide => "Face-Side",
            DropOrientation::FaceTop => "Face-Top",
        }
    }
}

/// Road mix of a transport route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RouteType {
    #[default]
    #[serde(rename = "Mixed (City + Highway)")]
    Mixed,
    #[serde(rename = "Primarily City")]
    PrimarilyCity,
    #[serde(rename = "Primarily Highway")]
    PrimarilyHighway,
    #[serde(rename = "Off-road/Rural")]
    OffRoadRural,
}

impl RouteType {
    /// All route types for UI selection
    pub const ALL: [RouteType; 4] = [
        RouteType::Mixed,
        RouteType::PrimarilyCity,
        RouteType::PrimarilyHighway,
        RouteType::OffRoadRural,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            RouteType::Mixed => "Mixed (City + Highway)",
            RouteType::PrimarilyCity => "Primarily City",
            RouteType::PrimarilyHighway => "Primarily Highway",
            RouteType::OffRoadRural => "Off-road/Rural",
        }
    }

    /// Resolve a label, falling back to [`RouteType::Mixed`] for anything unrecognised.
    pub fn from_label(label: &str) -> Self {
        let wanted = label.trim();
        match RouteType::ALL
            .into_iter()
            .find(|route| route.label().eq_ignore_ascii_case(wanted))
        {
            Some(route) => route,
            None => {
                log::warn!("unknown route type '{}', using {}", label, RouteType::Mixed.label());
                RouteType::Mixed
            }
        }
    }
}

/// Frequency band swept by the vibration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FrequencyBand {
    #[serde(rename = "5-50 Hz")]
    Hz5To50,
    #[serde(rename = "5-100 Hz")]
    Hz5To100,
    #[default]
    #[serde(rename = "5-200 Hz")]
    Hz5To200,
    #[serde(rename = "10-300 Hz")]
    Hz10To300,
}

impl FrequencyBand {
    /// All bands for UI selection
    pub const ALL: [FrequencyBand; 4] = [
        FrequencyBand::Hz5To50,
        FrequencyBand::Hz5To100,
        FrequencyBand::Hz5To200,
        FrequencyBand::Hz10To300,
    ];

    /// The widest supported band
    pub const WIDEST: FrequencyBand = FrequencyBand::Hz10To300;

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            FrequencyBand::Hz5To50 => "5-50 Hz",
            FrequencyBand::Hz5To100 => "5-100 Hz",
            FrequencyBand::Hz5To200 => "5-200 Hz",
            FrequencyBand::Hz10To300 => "10-300 Hz",
        }
    }

    /// Band limits `(min, max)` in Hz
    pub fn bounds_hz(&self) -> (f64, f64) {
        match self {
            FrequencyBand::Hz5To50 => (5.0, 50.0),
            FrequencyBand::Hz5To100 => (5.0, 100.0),
            FrequencyBand::Hz5To200 => (5.0, 200.0),
            FrequencyBand::Hz10To300 => (10.0, 300.0),
        }
    }

    /// Whether `frequency_hz` lies inside the band, limits included
    pub fn contains(&self, frequency_hz: f64) -> bool {
        let (min, max) = self.bounds_hz();
        (min..=max).contains(&frequency_hz)
    }

    /// Resolve a label, falling back to the widest band for anything unrecognised.
    pub fn from_label(label: &str) -> Self {
        let wanted = label.trim();
        match FrequencyBand::ALL
            .into_iter()
            .find(|band| band.label().eq_ignore_ascii_case(wanted))
        {
            Some(band) => band,
            None => {
                log::warn!(
                    "unknown frequency range '{}', using {}",
                    label,
                    FrequencyBand::WIDEST.label()
                );
                FrequencyBand::WIDEST
            }
        }
    }
}

// ============================================================================
// Scenario Configurations
// ============================================================================

/// Drop test parameters.
///
/// ## JSON Example
///
/// ```json
/// { "height_m": 1.5, "orientations": ["Corner", "Edge", "Face-Front"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropConfig {
    /// Drop height in metres
    pub height_m: f64,
    /// Impact orientations to report on (does not change the numbers)
    pub orientations: BTreeSet<DropOrientation>,
}

impl DropConfig {
    /// Drop from `height_m` using the default orientation set
    pub fn new(height_m: f64) -> Self {
        DropConfig {
            height_m,
            ..DropConfig::default()
        }
    }

    /// Replace the orientation set
    pub fn with_orientations(mut self, orientations: impl IntoIterator<Item = DropOrientation>) -> Self {
        self.orientations = orientations.into_iter().collect();
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> SimResult<()> {
        require_positive("height_m", self.height_m, "Drop height must be positive")?;
        if self.orientations.is_empty() {
            return Err(SimError::invalid_parameter(
                "orientations",
                "[]",
                "Select at least one impact orientation",
            ));
        }
        Ok(())
    }
}

impl Default for DropConfig {
    fn default() -> Self {
        DropConfig {
            height_m: 1.5,
            orientations: [
                DropOrientation::Corner,
                DropOrientation::Edge,
                DropOrientation::FaceFront,
            ]
            .into_iter()
            .collect(),
        }
    }
}

/// Vibration test parameters.
///
/// ## JSON Example
///
/// ```json
/// { "g_force_rms": 1.15, "frequency_range": "5-200 Hz", "stacking_load_n": 44.145 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibrationConfig {
    /// RMS acceleration level (g)
    pub g_force_rms: f64,
    /// Swept frequency band
    pub frequency_range: FrequencyBand,
    /// Load from boxes stacked on top (N). Informational.
    pub stacking_load_n: f64,
}

impl VibrationConfig {
    /// Build from a free-text band label; unknown labels use the widest band.
    pub fn new(g_force_rms: f64, frequency_range: &str, stacking_load_n: f64) -> Self {
        VibrationConfig {
            g_force_rms,
            frequency_range: FrequencyBand::from_label(frequency_range),
            stacking_load_n,
        }
    }

    /// Stacking load of `boxes_above` boxes of `kg_per_box` each
    pub fn stacking_load_from_boxes(boxes_above: u32, kg_per_box: f64) -> f64 {
        f64::from(boxes_above) * kg_per_box * STANDARD_GRAVITY
    }

    /// Validate input parameters.
    pub fn validate(&self) -> SimResult<()> {
        require_positive("g_force_rms", self.g_force_rms, "RMS g-force must be positive")?;
        if !(self.stacking_load_n.is_finite() && self.stacking_load_n >= 0.0) {
            return Err(SimError::invalid_parameter(
                "stacking_load_n",
                self.stacking_load_n.to_string(),
                "Stacking load must not be negative",
            ));
        }
        Ok(())
    }
}

impl Default for VibrationConfig {
    fn default() -> Self {
        VibrationConfig {
            g_force_rms: 1.15,
            frequency_range: FrequencyBand::Hz5To200,
            stacking_load_n: VibrationConfig::stacking_load_from_boxes(3, 1.5),
        }
    }
}

/// Transport simulation parameters.
///
/// ## JSON Example
///
/// ```json
/// { "distance_km": 5000, "route_type": "Mixed (City + Highway)" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Trip length in kilometres
    pub distance_km: u32,
    /// Road mix
    pub route_type: RouteType,
}

impl TransportConfig {
    /// Build from a free-text route label; unknown labels use the mixed route.
    pub fn new(distance_km: u32, route_type: &str) -> Self {
        TransportConfig {
            distance_km,
            route_type: RouteType::from_label(route_type),
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> SimResult<()> {
        if self.distance_km == 0 {
            return Err(SimError::invalid_parameter(
                "distance_km",
                "0",
                "Transport distance must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            distance_km: 5000,
            route_type: RouteType::Mixed,
        }
    }
}

/// One configured scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TestConfig {
    Drop(DropConfig),
    Vibration(VibrationConfig),
    #[serde(alias = "live_transport")]
    Transport(TransportConfig),
}

impl TestConfig {
    /// Default configuration for a test type
    pub fn default_for(test_type: TestType) -> Self {
        match test_type {
            TestType::Drop => TestConfig::Drop(DropConfig::default()),
            TestType::Vibration => TestConfig::Vibration(VibrationConfig::default()),
            TestType::Transport => TestConfig::Transport(TransportConfig::default()),
        }
    }

    /// The scenario kind
    pub fn test_type(&self) -> TestType {
        match self {
            TestConfig::Drop(_) => TestType::Drop,
            TestConfig::Vibration(_) => TestType::Vibration,
            TestConfig::Transport(_) => TestType::Transport,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> SimResult<()> {
        match self {
            TestConfig::Drop(c) => c.validate(),
            TestConfig::Vibration(c) => c.validate(),
            TestConfig::Transport(c) => c.validate(),
        }
    }
}

fn require_positive(field: &str, value: f64, reason: &str) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid_parameter(field, value.to_string(), reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_type_parsing() {
        assert_eq!("drop".parse::<TestType>().unwrap(), TestType::Drop);
        assert_eq!("Vibration".parse::<TestType>().unwrap(), TestType::Vibration);
        assert_eq!("live_transport".parse::<TestType>().unwrap(), TestType::Transport);
        assert_eq!("live transport".parse::<TestType>().unwrap(), TestType::Transport);
        assert_eq!(
            "compression".parse::<TestType>().unwrap_err(),
            SimError::unknown_test_type("compression")
        );
    }

    #[test]
    fn test_route_label_fallback() {
        assert_eq!(RouteType::from_label("Primarily City"), RouteType::PrimarilyCity);
        assert_eq!(RouteType::from_label("off-road/rural"), RouteType::OffRoadRural);
        assert_eq!(RouteType::from_label("Mountain pass"), RouteType::Mixed);
    }

    #[test]
    fn test_band_label_fallback() {
        assert_eq!(FrequencyBand::from_label("5-50 Hz"), FrequencyBand::Hz5To50);
        assert_eq!(FrequencyBand::from_label("1-2000 Hz"), FrequencyBand::Hz10To300);
        assert_eq!(FrequencyBand::Hz10To300.bounds_hz(), (10.0, 300.0));
        assert!(FrequencyBand::Hz5To100.contains(100.0));
        assert!(!FrequencyBand::Hz5To100.contains(150.0));
    }

    #[test]
    fn test_label_defaults() {
        assert_eq!(FrequencyBand::default(), FrequencyBand::Hz5To200);
        assert_eq!(RouteType::default(), RouteType::Mixed);
        assert_eq!(VibrationConfig::default().frequency_range, FrequencyBand::default());
    }

    #[test]
    fn test_drop_validation() {
        assert!(DropConfig::new(1.0).validate().is_ok());
        assert!(DropConfig::new(0.0).validate().is_err());
        assert!(DropConfig::new(-2.0).validate().is_err());
        assert!(DropConfig::new(f64::NAN).validate().is_err());
        assert!(DropConfig::new(1.0).with_orientations(Vec::new()).validate().is_err());
    }

    #[test]
    fn test_vibration_and_transport_validation() {
        assert!(VibrationConfig::new(0.0, "5-200 Hz", 0.0).validate().is_err());
        assert!(VibrationConfig::new(1.0, "5-200 Hz", -1.0).validate().is_err());
        assert!(TransportConfig::new(0, "Primarily City").validate().is_err());
        assert!(TransportConfig::new(1, "Primarily City").validate().is_ok());
    }

    #[test]
    fn test_default_stacking_load() {
        // 3 boxes x 1.5 kg x 9.81
        let config = VibrationConfig::default();
        assert!((config.stacking_load_n - 44.145).abs() < 1e-9);
    }

    #[test]
    fn test_config_json_shape() {
        let config = TestConfig::Transport(TransportConfig::new(800, "Off-road/Rural"));
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"{"type":"transport","distance_km":800,"route_type":"Off-road/Rural"}"#
        );

        let legacy = r#"{"type":"live_transport","distance_km":100,"route_type":"Primarily City"}"#;
        let parsed: TestConfig = serde_json::from_str(legacy).unwrap();
        assert_eq!(parsed.test_type(), TestType::Transport);
    }

    #[test]
    fn test_orientations_form_a_set() {
        let config = DropConfig::new(1.0).with_orientations([
            DropOrientation::Edge,
            DropOrientation::Edge,
            DropOrientation::Corner,
        ]);
        assert_eq!(config.orientations.len(), 2);
    }
}
