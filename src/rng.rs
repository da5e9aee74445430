// src/rng.rs
//! Random Number Generation for Monte Carlo Simulations
//!
//! # Design
//!
//! Every pricing call builds its own [`RngFactory`] from the configured seed.
//! Each simulated row gets an independent `StdRng` whose seed is derived from
//! `(base_seed, stream_id)`, so:
//! 1. **Reproducibility**: same seed → bit-identical paths
//! 2. **Parallel safety**: rows can be generated on any thread in any order
//! 3. **Isolation**: no RNG state is shared between calls
//!
//! # Stream Derivation
//!
//! Stream seeds are mixed with a splitmix64 finalizer:
//! ```text
//! z = base_seed + golden_gamma * (stream_id + 1)
//! z = (z ⊕ (z >> 30)) * 0xbf58476d1ce4e5b9
//! z = (z ⊕ (z >> 27)) * 0x94d049bb133111eb
//! seed = z ⊕ (z >> 31)
//! ```
//! so neighbouring seeds do not produce shifted copies of the same streams.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

const GOLDEN_GAMMA: u64 = 0x9e3779b97f4a7c15;

fn splitmix64(base_seed: u64, stream_id: u64) -> u64 {
    let mut z = base_seed.wrapping_add(GOLDEN_GAMMA.wrapping_mul(stream_id.wrapping_add(1)));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9u64);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111ebu64);
    z ^ (z >> 31)
}

/// RNG factory for reproducible parallel simulations
#[derive(Debug, Clone, Copy)]
pub struct RngFactory {
    base_seed: u64,
}

impl RngFactory {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Create an independent generator for one path (row) of a simulation
    pub fn create_std_rng(&self, stream_id: u64) -> StdRng {
        StdRng::seed_from_u64(splitmix64(self.base_seed, stream_id))
    }
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}
