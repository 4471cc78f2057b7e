//! # Stochastic Simulators
//!
//! Trace generators feeding the stress estimator:
//!
//! - [`transport`] - distance-indexed speed / g-force / elevation trace for a road trip
//! - [`vibration`] - frequency-indexed amplitude / phase response with resonances
//! - [`rng`] - the seedable random source every simulator draws from
//!
//! Simulators take `&mut R where R: rand::Rng` rather than reaching for a
//! global generator, so a seeded [`rng::SimRng`] reproduces a run exactly.

pub mod rng;
pub mod transport;
pub mod vibration;

pub use rng::SimRng;
pub use transport::{simulate_transport, RouteProfile, TransportTrace};
pub use vibration::{synthesize_vibration, VibrationResponse};
