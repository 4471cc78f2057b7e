//! # pack_core - Packaging Compliance Simulation Engine
//!
//! `pack_core` estimates whether a packaging design survives drop, vibration
//! and long-haul transport scenarios, and proposes corrective actions when it
//! does not. It is a parametric surrogate, not a finite-element solver: stress
//! figures scale from the material's yield strength through fixed ratios, and
//! the vibration and transport traces are synthesized stochastically.
//!
//! ## Design Philosophy
//!
//! - **JSON-First**: every input, result and report implements Serialize/Deserialize
//! - **Injected randomness**: simulators take `&mut impl Rng`; a seeded
//!   [`simulation::SimRng`] reproduces a study exactly
//! - **Rich Errors**: structured [`SimError`] values with stable error codes
//! - **No globals**: the material catalog is a value owned by each [`Pipeline`]
//!
//! ## Quick Start
//!
//! ```rust
//! use pack_core::pipeline::Pipeline;
//! use pack_core::recommendations::OptimizationChoice;
//! use pack_core::scenarios::{DropConfig, TestConfig, VibrationConfig};
//! use pack_core::session::Session;
//! use pack_core::simulation::rng;
//!
//! let mut pipeline = Pipeline::with_rng(Session::new("Engineer", "Tray"), rng::seeded(7)).unwrap();
//! pipeline
//!     .configure(vec![
//!         TestConfig::Drop(DropConfig::new(4.0)),
//!         TestConfig::Vibration(VibrationConfig::default()),
//!     ])
//!     .unwrap();
//!
//! let report = pipeline.run_all().unwrap();
//! assert_eq!(report.failed.len(), 1);
//!
//! let rec = pipeline.recommend().unwrap();
//! pipeline
//!     .apply_optimization(OptimizationChoice::StructuralModifications, &rec)
//!     .unwrap();
//! assert!(pipeline.aggregate().unwrap().overall.is_pass());
//! ```
//!
//! ## Modules
//!
//! - [`materials`] - Material records and the catalog
//! - [`scenarios`] - Test types and their configurations
//! - [`simulation`] - Transport and vibration trace generators
//! - [`calculations`] - Stress / safety-factor estimation per scenario
//! - [`recommendations`] - Corrective actions and material optimization
//! - [`pipeline`] - The study orchestrator
//! - [`consultation`] - Read-only snapshot for advisory layers
//! - [`scoring`] - Multi-criteria performance profile
//! - [`workflow`] - Study step state machine
//! - [`session`] - Session container, metadata and settings
//! - [`file_io`] - Atomic session saves and version-checked loads
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod consultation;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod pipeline;
pub mod recommendations;
pub mod scenarios;
pub mod scoring;
pub mod session;
pub mod simulation;
pub mod units;
pub mod workflow;

// Re-export commonly used types at crate root for convenience
pub use calculations::{TestResult, Verdict};
pub use errors::{SimError, SimResult};
pub use file_io::{load_session, save_session};
pub use materials::{Material, MaterialCatalog};
pub use pipeline::{ComplianceReport, Pipeline};
pub use recommendations::{OptimizationChoice, Recommendation};
pub use scenarios::{TestConfig, TestType};
pub use session::{Session, SessionMetadata, SessionSettings};
