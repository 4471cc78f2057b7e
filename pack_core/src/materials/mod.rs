//! # Materials Catalog
//!
//! Material records and the per-session catalog that resolves material keys.
//!
//! The built-in packaging materials (see [`builtin`]) are a process-wide,
//! immutable seed table. A [`MaterialCatalog`] starts from a copy of that table
//! and may gain derived entries at runtime (an optimized material synthesized
//! by the recommendation engine). Entries are only ever added or overwritten,
//! never removed.
//!
//! ## Example
//!
//! ```rust
//! use pack_core::materials::MaterialCatalog;
//!
//! let catalog = MaterialCatalog::with_builtins();
//! let pp = catalog.get("PP").unwrap();
//! assert_eq!(pp.name, "Polypropylene");
//! assert_eq!(pp.yield_strength_pa, 30e6);
//! ```

pub mod builtin;

pub use builtin::{builtin_materials, DEFAULT_MATERIAL_KEY};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{SimError, SimResult};
use crate::units::{Megapascals, Pascals};

/// Mechanical and commercial properties of a packaging material.
///
/// ## JSON Example
///
/// ```json
/// {
///   "name": "Polypropylene",
///   "density_kg_m3": 900.0,
///   "youngs_modulus_pa": 1300000000.0,
///   "poisson_ratio": 0.4,
///   "yield_strength_pa": 30000000.0,
///   "ultimate_strength_pa": 38000000.0,
///   "cost_per_kg": 1.2,
///   "description": "Superior fatigue resistance with excellent chemical compatibility"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Display name
    pub name: String,
    /// Density (kg/m³)
    pub density_kg_m3: f64,
    /// Young's modulus (Pa)
    pub youngs_modulus_pa: f64,
    /// Poisson's ratio (dimensionless)
    pub poisson_ratio: f64,
    /// Yield strength (Pa)
    pub yield_strength_pa: f64,
    /// Ultimate tensile strength (Pa)
    pub ultimate_strength_pa: f64,
    /// Cost per kilogram (currency units)
    pub cost_per_kg: f64,
    /// Free-text description
    pub description: String,
}

impl Material {
    /// Yield strength in MPa, the base stress every estimate scales from.
    pub fn yield_strength_mpa(&self) -> Megapascals {
        Pascals(self.yield_strength_pa).into()
    }

    /// Strength-to-weight ratio: yield (MPa) per density, scaled by 1000.
    pub fn strength_to_weight(&self) -> f64 {
        self.yield_strength_mpa().0 / self.density_kg_m3 * 1000.0
    }

    /// Check the record's physical invariants.
    pub fn validate(&self) -> SimResult<()> {
        let positive = [
            ("density_kg_m3", self.density_kg_m3),
            ("youngs_modulus_pa", self.youngs_modulus_pa),
            ("yield_strength_pa", self.yield_strength_pa),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::invalid_parameter(
                    field,
                    value.to_string(),
                    "Must be a positive number",
                ));
            }
        }
        if !(0.0..=0.5).contains(&self.poisson_ratio) {
            return Err(SimError::invalid_parameter(
                "poisson_ratio",
                self.poisson_ratio.to_string(),
                "Poisson's ratio must lie in [0, 0.5]",
            ));
        }
        if self.ultimate_strength_pa < self.yield_strength_pa {
            return Err(SimError::invalid_parameter(
                "ultimate_strength_pa",
                self.ultimate_strength_pa.to_string(),
                "Ultimate strength must not be below yield strength",
            ));
        }
        if self.cost_per_kg < 0.0 {
            return Err(SimError::invalid_parameter(
                "cost_per_kg",
                self.cost_per_kg.to_string(),
                "Cost must not be negative",
            ));
        }
        Ok(())
    }
}

/// Keyed store of materials available to one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalog {
    materials: BTreeMap<String, Material>,
}

impl MaterialCatalog {
    /// A catalog seeded with the built-in packaging materials.
    pub fn with_builtins() -> Self {
        let materials = builtin_materials()
            .iter()
            .map(|(key, material)| (key.to_string(), material.clone()))
            .collect();
        MaterialCatalog { materials }
    }

    /// Look up a material by key.
    pub fn get(&self, key: &str) -> SimResult<&Material> {
        self.materials
            .get(key)
            .ok_or_else(|| SimError::unknown_material(key))
    }

    /// Insert or overwrite a material under `key`.
    pub fn register(&mut self, key: impl Into<String>, material: Material) {
        let key = key.into();
        log::debug!("registering material '{}' ({})", key, material.name);
        self.materials.insert(key, material);
    }

    /// Whether `key` resolves to a material.
    pub fn contains(&self, key: &str) -> bool {
        self.materials.contains_key(key)
    }

    /// Material keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    /// All entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Material)> {
        self.materials.iter().map(|(k, m)| (k.as_str(), m))
    }

    /// Entries that are not part of the built-in table.
    pub fn derived(&self) -> impl Iterator<Item = (&str, &Material)> {
        self.iter().filter(|(key, _)| !builtin::is_builtin(key))
    }

    /// Number of materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the catalog holds no materials.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        MaterialCatalog::with_builtins()
    }
}
