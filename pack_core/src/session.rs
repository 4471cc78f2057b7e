//! # Session Data Structures
//!
//! The `Session` struct is the root container for one compliance study.
//! Sessions serialize to `.pks` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Session
//! ├── meta: SessionMetadata (id, version, engineer, label, timestamps)
//! ├── settings: SessionSettings (default material, seed)
//! ├── tests: Vec<TestConfig> (configured scenarios, in run order)
//! ├── selected_material: String
//! ├── results: BTreeMap<TestType, TestResult> (latest result per scenario)
//! ├── custom_materials: BTreeMap<String, Material> (derived materials)
//! └── optimization_applied: bool
//! ```
//!
//! ## Example
//!
//! ```rust
//! use pack_core::session::Session;
//!
//! let session = Session::new("Jane Engineer", "Bottle crate rev B");
//! assert_eq!(session.selected_material, "PP");
//!
//! let json = serde_json::to_string_pretty(&session).unwrap();
//! assert!(json.contains("Bottle crate rev B"));
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{TestResult, PASS_THRESHOLD};
use crate::materials::{Material, DEFAULT_MATERIAL_KEY};
use crate::scenarios::{TestConfig, TestType};

/// Current schema version for .pks files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root session container.
///
/// Results are keyed by scenario type, so re-running a scenario replaces its
/// previous result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub meta: SessionMetadata,

    pub settings: SessionSettings,

    /// Configured scenarios in run order, at most one per type
    pub tests: Vec<TestConfig>,

    /// Catalog key of the material under evaluation
    pub selected_material: String,

    pub results: BTreeMap<TestType, TestResult>,

    /// Derived materials registered during the session (e.g. `PP_Optimized`)
    #[serde(default)]
    pub custom_materials: BTreeMap<String, Material>,

    /// Whether the latest results were adjusted by an optimization
    #[serde(default)]
    pub optimization_applied: bool,
}

impl Session {
    /// Create a new empty session.
    ///
    /// # Arguments
    ///
    /// * `engineer` - Name of the responsible engineer
    /// * `label` - Free-form name of the design under study
    pub fn new(engineer: impl Into<String>, label: impl Into<String>) -> Self {
        Session::with_settings(engineer, label, SessionSettings::default())
    }

    /// Create a new empty session with explicit settings.
    ///
    /// The selected material starts at `settings.default_material`.
    pub fn with_settings(
        engineer: impl Into<String>,
        label: impl Into<String>,
        settings: SessionSettings,
    ) -> Self {
        let now = Utc::now();
        Session {
            meta: SessionMetadata {
                id: Uuid::new_v4(),
                version: SCHEMA_VERSION.to_string(),
                engineer: engineer.into(),
                label: label.into(),
                created: now,
                modified: now,
            },
            selected_material: settings.default_material.clone(),
            settings,
            tests: Vec::new(),
            results: BTreeMap::new(),
            custom_materials: BTreeMap::new(),
            optimization_applied: false,
        }
    }

    /// Configured scenario of the given type, if any
    pub fn test(&self, test_type: TestType) -> Option<&TestConfig> {
        self.tests.iter().find(|t| t.test_type() == test_type)
    }

    /// Configured scenario types in run order
    pub fn test_types(&self) -> Vec<TestType> {
        self.tests.iter().map(TestConfig::test_type).collect()
    }

    /// Results in configured order.
    ///
    /// Results for scenarios no longer configured are skipped.
    pub fn ordered_results(&self) -> Vec<&TestResult> {
        self.tests
            .iter()
            .filter_map(|t| self.results.get(&t.test_type()))
            .collect()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new("", "")
    }
}

/// Session metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub id: Uuid,

    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Name of the design under study
    pub label: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Per-session settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Material selected when the session starts
    pub default_material: String,

    /// Safety factor a scenario must exceed; informational, the estimator
    /// always applies [`PASS_THRESHOLD`]
    pub pass_threshold: f64,

    /// Seed for the simulators; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            default_material: DEFAULT_MATERIAL_KEY.to_string(),
            pass_threshold: PASS_THRESHOLD,
            seed: None,
        }
    }
}
