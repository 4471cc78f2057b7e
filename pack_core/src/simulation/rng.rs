//! Seedable simulation RNG.
//!
//! Wraps `ChaCha8Rng` so the same seed yields the same trace on every
//! platform. Sessions without a seed draw one from OS entropy.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Random source shared by the simulators of one pipeline.
pub type SimRng = ChaCha8Rng;

/// A generator with a fixed seed.
pub fn seeded(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// A generator seeded from OS entropy.
pub fn from_entropy() -> SimRng {
    ChaCha8Rng::from_entropy()
}

/// A fixed-seed generator when `seed` is set, otherwise an entropy-seeded one.
pub fn from_optional_seed(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => seeded(seed),
        None => from_entropy(),
    }
}
