//! # Pipeline Orchestrator
//!
//! Sequences a compliance study: configure scenarios, pick a material, run
//! every scenario, aggregate a report, derive recommendations and apply one.
//!
//! A [`Pipeline`] owns its [`MaterialCatalog`], its [`Session`] and its random
//! source. Independent pipelines share nothing mutable, and a pipeline built
//! around a seeded RNG reproduces its traces exactly.
//!
//! ## Example
//!
//! ```rust
//! use pack_core::pipeline::Pipeline;
//! use pack_core::scenarios::{DropConfig, TestConfig};
//! use pack_core::session::Session;
//! use pack_core::simulation::rng;
//!
//! let mut pipeline = Pipeline::with_rng(Session::default(), rng::seeded(42)).unwrap();
//! pipeline.configure(vec![TestConfig::Drop(DropConfig::new(1.5))]).unwrap();
//!
//! let report = pipeline.run_all().unwrap();
//! assert!(report.overall.is_pass());
//! assert!((report.min_safety_factor - 2.04).abs() < 0.01);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::calculations::{estimate, TestResult, Verdict};
use crate::consultation::ConsultationContext;
use crate::errors::{SimError, SimResult};
use crate::materials::{Material, MaterialCatalog};
use crate::recommendations::{recommend, OptimizationChoice, Recommendation};
use crate::scenarios::{TestConfig, TestType};
use crate::scoring::PerformanceProfile;
use crate::session::Session;
use crate::simulation::rng::{self, SimRng};

/// Safety factor every previously failing scenario is raised to after an optimization
pub const OPTIMIZED_SAFETY_FLOOR: f64 = 2.3;

/// Suffix of the catalog key an adopted optimized material is stored under
pub const OPTIMIZED_KEY_SUFFIX: &str = "_Optimized";

/// Aggregate verdict over the latest results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// PASS iff no scenario failed
    pub overall: Verdict,
    /// Passing scenarios in configured order
    pub passed: Vec<TestType>,
    /// Failing scenarios in configured order
    pub failed: Vec<TestType>,
    pub max_stress_mpa: f64,
    pub min_safety_factor: f64,
    /// passed / total
    pub compliance_rate: f64,
}

impl ComplianceReport {
    /// Aggregate `results`.
    ///
    /// # Errors
    ///
    /// `NoResults` when `results` is empty.
    pub fn from_results(results: &[&TestResult]) -> SimResult<Self> {
        if results.is_empty() {
            return Err(SimError::NoResults);
        }

        let (passed, failed): (Vec<&TestResult>, Vec<&TestResult>) =
            results.iter().partition(|r| r.passes());

        Ok(ComplianceReport {
            overall: if failed.is_empty() {
                Verdict::Pass
            } else {
                Verdict::Fail
            },
            compliance_rate: passed.len() as f64 / results.len() as f64,
            passed: passed.iter().map(|r| r.test_type).collect(),
            failed: failed.iter().map(|r| r.test_type).collect(),
            max_stress_mpa: results
                .iter()
                .map(|r| r.max_stress_mpa)
                .fold(f64::NEG_INFINITY, f64::max),
            min_safety_factor: results
                .iter()
                .map(|r| r.safety_factor)
                .fold(f64::INFINITY, f64::min),
        })
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

/// Stateful driver of one compliance study.
pub struct Pipeline<R: Rng = SimRng> {
    catalog: MaterialCatalog,
    session: Session,
    rng: R,
}

impl Pipeline {
    /// Empty session with default settings and an entropy-seeded RNG.
    pub fn new() -> Self {
        Pipeline {
            catalog: MaterialCatalog::with_builtins(),
            session: Session::default(),
            rng: rng::from_entropy(),
        }
    }

    /// Resume `session`, seeding the RNG from `session.settings.seed`.
    ///
    /// # Errors
    ///
    /// * `UnknownMaterial` - the selected material is neither built in nor
    ///   among the session's derived materials
    /// * `InvalidParameter` - a derived material fails validation
    pub fn from_session(session: Session) -> SimResult<Self> {
        let rng = rng::from_optional_seed(session.settings.seed);
        Pipeline::with_rng(session, rng)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new()
    }
}

impl<R: Rng> Pipeline<R> {
    /// Build a pipeline around `session` with an explicit random source.
    ///
    /// Derived materials recorded in the session are registered in the catalog.
    /// The session's tests go through the same validation and per-type merge
    /// as [`Pipeline::configure`], and results without a configured test are
    /// dropped.
    ///
    /// # Errors
    ///
    /// * `UnknownMaterial` - the selected material is not in the catalog
    /// * `InvalidParameter` - a derived material or a test config is invalid
    pub fn with_rng(mut session: Session, rng: R) -> SimResult<Self> {
        let mut catalog = MaterialCatalog::with_builtins();
        for (key, material) in &session.custom_materials {
            material.validate()?;
            catalog.register(key.clone(), material.clone());
        }
        catalog.get(&session.selected_material)?;

        let tests = merge_configs(std::mem::take(&mut session.tests))?;
        session.results.retain(|t, _| tests.iter().any(|c| c.test_type() == *t));
        session.tests = tests;

        Ok(Pipeline {
            catalog,
            session,
            rng,
        })
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        &self.catalog
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Give up the pipeline, keeping its session (e.g. to save it)
    pub fn into_session(self) -> Session {
        self.session
    }

    /// Replace the configured scenarios.
    ///
    /// A later config of an already listed type replaces the earlier one in
    /// place. Results of types no longer configured are dropped.
    ///
    /// # Errors
    ///
    /// * `NoTestsSelected` - `tests` is empty
    /// * `InvalidParameter` - a config fails validation
    pub fn configure(&mut self, tests: Vec<TestConfig>) -> SimResult<()> {
        if tests.is_empty() {
            return Err(SimError::NoTestsSelected);
        }

        let configured = merge_configs(tests)?;
        self.session
            .results
            .retain(|t, _| configured.iter().any(|c| c.test_type() == *t));
        self.session.tests = configured;
        self.session.touch();

        log::info!("configured tests: {:?}", self.session.test_types());
        Ok(())
    }

    /// Select the material every subsequent estimate uses.
    pub fn select_material(&mut self, key: &str) -> SimResult<()> {
        self.catalog.get(key)?;
        self.session.selected_material = key.to_string();
        self.session.touch();
        log::info!("selected material {}", key);
        Ok(())
    }

    pub fn selected_material_key(&self) -> &str {
        &self.session.selected_material
    }

    pub fn selected_material(&self) -> SimResult<&Material> {
        self.catalog.get(&self.session.selected_material)
    }

    /// Register a derived material under `key` and record it in the session.
    pub fn register_material(&mut self, key: impl Into<String>, material: Material) -> SimResult<()> {
        material.validate()?;
        let key = key.into();
        self.catalog.register(key.clone(), material.clone());
        self.session.custom_materials.insert(key, material);
        self.session.touch();
        Ok(())
    }

    /// Estimate every configured scenario in order and report.
    ///
    /// Clears the optimization-applied flag.
    ///
    /// # Errors
    ///
    /// * `NoTestsSelected` - nothing configured
    /// * `UnknownMaterial` - the selected material vanished from the catalog
    pub fn run_all(&mut self) -> SimResult<ComplianceReport> {
        if self.session.tests.is_empty() {
            return Err(SimError::NoTestsSelected);
        }

        let material = self.catalog.get(&self.session.selected_material)?;
        log::info!(
            "running {} tests on {}",
            self.session.tests.len(),
            self.session.selected_material
        );

        let results = self
            .session
            .tests
            .iter()
            .map(|config| estimate(config, material, &mut self.rng))
            .collect::<SimResult<Vec<_>>>()?;
        self.session.results = results.into_iter().map(|r| (r.test_type, r)).collect();
        self.session.optimization_applied = false;
        self.session.touch();

        let report = self.aggregate()?;
        log::info!(
            "overall {} ({}/{} passed, min SF {:.2})",
            report.overall,
            report.passed.len(),
            report.total(),
            report.min_safety_factor
        );
        Ok(report)
    }

    /// Latest result of one scenario
    pub fn result(&self, test_type: TestType) -> Option<&TestResult> {
        self.session.results.get(&test_type)
    }

    /// Latest results in configured order
    pub fn results(&self) -> Vec<&TestResult> {
        self.session.ordered_results()
    }

    /// Aggregate the latest results.
    pub fn aggregate(&self) -> SimResult<ComplianceReport> {
        ComplianceReport::from_results(&self.results())
    }

    /// Failing results in configured order
    pub fn failed_results(&self) -> Vec<&TestResult> {
        self.results().into_iter().filter(|r| !r.passes()).collect()
    }

    /// Recommendations for the current failures (empty when everything passed).
    ///
    /// # Errors
    ///
    /// `NoResults` before the first run.
    pub fn recommend(&self) -> SimResult<Recommendation> {
        if self.session.results.is_empty() {
            return Err(SimError::NoResults);
        }
        Ok(recommend(&self.failed_results(), self.selected_material()?))
    }

    /// Act on a recommendation.
    ///
    /// Choosing [`OptimizationChoice::OptimizedMaterial`] while `recommendation`
    /// carries a synthesized material registers it as
    /// `"<selected key>_Optimized"` and selects it. Every previously failing
    /// scenario is then re-estimated with the selected material, lifted to a
    /// safety factor of at least 2.3 and marked PASS.
    ///
    /// Returns the re-estimated scenario types in configured order.
    pub fn apply_optimization(
        &mut self,
        choice: OptimizationChoice,
        recommendation: &Recommendation,
    ) -> SimResult<Vec<TestType>> {
        let failed: Vec<TestType> = self.failed_results().iter().map(|r| r.test_type).collect();

        if choice == OptimizationChoice::OptimizedMaterial {
            if let Some(optimized) = &recommendation.new_material {
                let key = format!("{}{}", self.session.selected_material, OPTIMIZED_KEY_SUFFIX);
                self.register_material(key.clone(), optimized.clone())?;
                self.select_material(&key)?;
            }
        }

        let material = self.catalog.get(&self.session.selected_material)?;
        for test_type in &failed {
            let Some(config) = self.session.tests.iter().find(|c| c.test_type() == *test_type)
            else {
                continue;
            };
            let mut result = estimate(config, material, &mut self.rng)?;
            result.force_pass(OPTIMIZED_SAFETY_FLOOR);
            self.session.results.insert(*test_type, result);
        }

        self.session.optimization_applied = true;
        self.session.touch();
        log::info!(
            "applied {} to {:?} using {}",
            choice.label(),
            failed,
            self.session.selected_material
        );
        Ok(failed)
    }

    pub fn optimization_applied(&self) -> bool {
        self.session.optimization_applied
    }

    /// Read-only snapshot for an advisory layer.
    pub fn consultation(&self) -> SimResult<ConsultationContext> {
        Ok(ConsultationContext::new(
            self.session.selected_material.clone(),
            self.selected_material()?,
            &self.results(),
            self.session.optimization_applied,
        ))
    }

    /// Score card for the latest results. Draws from the pipeline's RNG.
    pub fn performance_profile(&mut self) -> SimResult<PerformanceProfile> {
        let results = self.session.ordered_results();
        PerformanceProfile::score(&results, self.session.optimization_applied, &mut self.rng)
    }
}

/// Validate `tests`, keeping one config per type.
///
/// A later config of an already listed type replaces the earlier one in place.
fn merge_configs(tests: Vec<TestConfig>) -> SimResult<Vec<TestConfig>> {
    let mut configured: Vec<TestConfig> = Vec::with_capacity(tests.len());
    for test in tests {
        test.validate()?;
        match configured
            .iter_mut()
            .find(|c| c.test_type() == test.test_type())
        {
            Some(existing) => *existing = test,
            None => configured.push(test),
        }
    }
    Ok(configured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{DropConfig, TransportConfig, VibrationConfig};
    use approx::assert_relative_eq;

    fn pipeline(seed: u64) -> Pipeline {
        Pipeline::with_rng(Session::default(), rng::seeded(seed)).unwrap()
    }

    #[test]
    fn test_configure_rejects_empty() {
        let mut p = pipeline(1);
        assert_eq!(p.configure(vec![]).unwrap_err(), SimError::NoTestsSelected);
        assert_eq!(p.run_all().unwrap_err(), SimError::NoTestsSelected);
    }

    #[test]
    fn test_configure_replaces_same_type_in_place() {
        let mut p = pipeline(2);
        p.configure(vec![
            TestConfig::Drop(DropConfig::new(1.0)),
            TestConfig::Vibration(VibrationConfig::default()),
            TestConfig::Drop(DropConfig::new(3.0)),
        ])
        .unwrap();

        assert_eq!(p.session().test_types(), vec![TestType::Drop, TestType::Vibration]);
        match p.session().test(TestType::Drop).unwrap() {
            TestConfig::Drop(c) => assert_eq!(c.height_m, 3.0),
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_configure_validates() {
        let mut p = pipeline(3);
        let err = p
            .configure(vec![TestConfig::Transport(TransportConfig::new(0, "Primarily City"))])
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_select_unknown_material() {
        let mut p = pipeline(4);
        assert_eq!(
            p.select_material("Kevlar").unwrap_err(),
            SimError::unknown_material("Kevlar")
        );
        assert_eq!(p.selected_material_key(), "PP");
    }

    #[test]
    fn test_aggregate_before_run() {
        let p = pipeline(5);
        assert_eq!(p.aggregate().unwrap_err(), SimError::NoResults);
        assert_eq!(p.recommend().unwrap_err(), SimError::NoResults);
    }

    #[test]
    fn test_report_partition() {
        let mut p = pipeline(6);
        p.configure(vec![
            TestConfig::Vibration(VibrationConfig::default()),
            TestConfig::Drop(DropConfig::new(4.0)),
        ])
        .unwrap();
        let report = p.run_all().unwrap();

        assert_eq!(report.overall, Verdict::Fail);
        assert_eq!(report.passed, vec![TestType::Vibration]);
        assert_eq!(report.failed, vec![TestType::Drop]);
        assert_relative_eq!(report.compliance_rate, 0.5);
        assert_relative_eq!(report.min_safety_factor, 1.25, epsilon = 1e-12);
        // Drop at 4 m: 30 * 0.4 * 2 = 24 MPa
        assert_relative_eq!(report.max_stress_mpa, 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dropping_a_type_drops_its_result() {
        let mut p = pipeline(7);
        p.configure(vec![
            TestConfig::Drop(DropConfig::new(1.0)),
            TestConfig::Vibration(VibrationConfig::default()),
        ])
        .unwrap();
        p.run_all().unwrap();
        assert_eq!(p.results().len(), 2);

        p.configure(vec![TestConfig::Vibration(VibrationConfig::default())]).unwrap();
        assert!(p.result(TestType::Drop).is_none());
        assert_eq!(p.aggregate().unwrap().total(), 1);
    }

    #[test]
    fn test_apply_structural_choice_keeps_material() {
        let mut p = pipeline(8);
        p.configure(vec![TestConfig::Drop(DropConfig::new(4.0))]).unwrap();
        p.run_all().unwrap();

        let rec = p.recommend().unwrap();
        assert!(rec.new_material.is_none());

        let touched = p
            .apply_optimization(OptimizationChoice::StructuralModifications, &rec)
            .unwrap();
        assert_eq!(touched, vec![TestType::Drop]);
        assert_eq!(p.selected_material_key(), "PP");

        let drop = p.result(TestType::Drop).unwrap();
        assert!(drop.passes());
        assert_relative_eq!(drop.safety_factor, OPTIMIZED_SAFETY_FLOOR);
        assert!(p.optimization_applied());

        // A fresh run discards the adjustment
        p.run_all().unwrap();
        assert!(!p.optimization_applied());
        assert!(!p.result(TestType::Drop).unwrap().passes());
    }

    #[test]
    fn test_register_material_is_persisted_in_session() {
        let mut p = pipeline(9);
        let mut custom = p.selected_material().unwrap().clone();
        custom.name = "Recycled PP".to_string();
        p.register_material("rPP", custom).unwrap();

        assert!(p.catalog().contains("rPP"));
        assert!(p.session().custom_materials.contains_key("rPP"));

        let resumed = Pipeline::with_rng(p.into_session(), rng::seeded(9)).unwrap();
        assert!(resumed.catalog().contains("rPP"));
    }

    #[test]
    fn test_resume_with_missing_material() {
        let mut session = Session::default();
        session.selected_material = "PP_Optimized".to_string();
        let err = Pipeline::with_rng(session, rng::seeded(10)).err().unwrap();
        assert_eq!(err.error_code(), "UNKNOWN_MATERIAL");
    }

    #[test]
    fn test_resume_merges_duplicate_tests() {
        let mut session = Session::default();
        session.tests = vec![
            TestConfig::Drop(DropConfig::new(1.0)),
            TestConfig::Drop(DropConfig::new(4.0)),
        ];
        let mut p = Pipeline::with_rng(session, rng::seeded(11)).unwrap();
        assert_eq!(p.session().test_types(), vec![TestType::Drop]);

        let report = p.run_all().unwrap();
        assert_eq!(report.total(), 1);
        assert_eq!(report.failed, vec![TestType::Drop]);
        assert_relative_eq!(report.compliance_rate, 0.0);
        assert_eq!(p.results().len(), 1);
    }

    #[test]
    fn test_resume_validates_tests() {
        let mut session = Session::default();
        session.tests = vec![
            TestConfig::Drop(DropConfig::new(4.0)),
            TestConfig::Vibration(VibrationConfig::new(-1.0, "5-50 Hz", 0.0)),
        ];
        let err = Pipeline::with_rng(session, rng::seeded(12)).err().unwrap();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
    }

    #[test]
    fn test_resume_drops_orphan_results() {
        let mut p = pipeline(13);
        p.configure(vec![
            TestConfig::Drop(DropConfig::new(1.0)),
            TestConfig::Vibration(VibrationConfig::default()),
        ])
        .unwrap();
        p.run_all().unwrap();

        let mut session = p.into_session();
        session.tests.retain(|c| c.test_type() == TestType::Drop);
        let resumed = Pipeline::with_rng(session, rng::seeded(13)).unwrap();
        assert!(resumed.result(TestType::Vibration).is_none());
        assert_eq!(resumed.aggregate().unwrap().total(), 1);
    }

    #[test]
    fn test_failed_run_keeps_previous_results() {
        let mut p = pipeline(14);
        p.configure(vec![TestConfig::Drop(DropConfig::new(1.0))])
            .unwrap();
        p.run_all().unwrap();
        let before = p.session().results.clone();
        p.session.optimization_applied = true;

        p.session.tests = vec![
            TestConfig::Drop(DropConfig::new(4.0)),
            TestConfig::Vibration(VibrationConfig::new(-1.0, "5-50 Hz", 0.0)),
        ];
        let err = p.run_all().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PARAMETER");
        assert_eq!(p.session().results, before);
        assert!(p.optimization_applied());
    }
}
