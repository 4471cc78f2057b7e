//! Built-in packaging materials.
//!
//! Reference values for the five stock materials offered at session start.
//! Densities in kg/m³, moduli and strengths in Pa, cost in currency per kg.

use once_cell::sync::Lazy;

use super::Material;

/// Material selected when a session starts
pub const DEFAULT_MATERIAL_KEY: &str = "PP";

/// Keys of the built-in table, in presentation order
pub const BUILTIN_KEYS: [&str; 5] = ["HDPE", "PP", "PET", "Cardboard", "Aluminum"];

static BUILTIN_MATERIALS: Lazy<Vec<(&'static str, Material)>> = Lazy::new(|| {
    vec![
        (
            "HDPE",
            material(
                "High-Density Polyethylene",
                960.0,
                1200e6,
                0.42,
                26e6,
                34e6,
                1.5,
                "Excellent chemical resistance and impact strength for rigid packaging applications",
            ),
        ),
        (
            "PP",
            material(
                "Polypropylene",
                900.0,
                1300e6,
                0.40,
                30e6,
                38e6,
                1.2,
                "Superior fatigue resistance with excellent chemical compatibility",
            ),
        ),
        (
            "PET",
            material(
                "Polyethylene Terephthalate",
                1380.0,
                2800e6,
                0.37,
                55e6,
                75e6,
                2.1,
                "High-performance thermoplastic with exceptional clarity and barrier properties",
            ),
        ),
        (
            "Cardboard",
            material(
                "Corrugated Cardboard",
                700.0,
                4000e6,
                0.30,
                12e6,
                18e6,
                0.8,
                "Sustainable fiber-based material optimized for lightweight protection",
            ),
        ),
        (
            "Aluminum",
            material(
                "Aluminum Alloy",
                2700.0,
                70e9,
                0.33,
                100e6,
                130e6,
                4.2,
                "High-strength metal alloy with superior barrier and formability characteristics",
            ),
        ),
    ]
});

#[allow(clippy::too_many_arguments)]
fn material(
    name: &str,
    density_kg_m3: f64,
    youngs_modulus_pa: f64,
    poisson_ratio: f64,
    yield_strength_pa: f64,
    ultimate_strength_pa: f64,
    cost_per_kg: f64,
    description: &str,
) -> Material {
    Material {
        name: name.to_string(),
        density_kg_m3,
        youngs_modulus_pa,
        poisson_ratio,
        yield_strength_pa,
        ultimate_strength_pa,
        cost_per_kg,
        description: description.to_string(),
    }
}

/// The built-in table, in presentation order.
pub fn builtin_materials() -> &'static [(&'static str, Material)] {
    &BUILTIN_MATERIALS
}

/// Whether `key` names a built-in material
pub fn is_builtin(key: &str) -> bool {
    BUILTIN_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_keys_match_table() {
        let keys: Vec<&str> = builtin_materials().iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, BUILTIN_KEYS.to_vec());
        assert!(is_builtin(DEFAULT_MATERIAL_KEY));
    }

    #[test]
    fn test_ultimate_at_least_yield() {
        for (key, material) in builtin_materials() {
            assert!(
                material.ultimate_strength_pa >= material.yield_strength_pa,
                "{} violates ultimate >= yield",
                key
            );
            assert!(material.validate().is_ok(), "{} failed validation", key);
        }
    }

    #[test]
    fn test_reference_values() {
        let (_, aluminum) = &builtin_materials()[4];
        assert_eq!(aluminum.youngs_modulus_pa, 70e9);
        assert_eq!(aluminum.cost_per_kg, 4.2);
        let (_, cardboard) = &builtin_materials()[3];
        assert_eq!(cardboard.yield_strength_pa, 12e6);
        assert_eq!(cardboard.density_kg_m3, 700.0);
    }
}
