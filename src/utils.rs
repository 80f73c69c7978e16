//! Shared helpers

use rand::{SeedableRng, rngs::StdRng};

/// A seeded generator when `seed` is given, otherwise one seeded from the
/// thread-local generator.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Derive an independent stream seed from a base seed, so one user-facing
/// seed can drive several generators reproducibly.
pub fn derive_seed(seed: Option<u64>, stream: u64) -> Option<u64> {
    seed.map(|s| s ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Fraction `part / total`, or 0 when `total` is 0
pub fn rate(part: usize, total: usize) -> f64 {
    if total > 0 {
        part as f64 / total as f64
    } else {
        0.0
    }
}
