//! Ternary and uniform samplers over RNS polynomials.
//!
//! All samplers draw from [`ChaCha20Rng`]. Production instances are seeded
//! from the operating system through [`fresh_rng`]; tests seed them
//! explicitly with `seed_from_u64`.

use rand::rngs::OsRng;
use rand::seq::index;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use super::poly::Poly;
use super::ring::Ring;

/// A ChaCha20 stream seeded from the operating system.
///
/// # Panics
///
/// Panics if the system randomness source fails.
pub fn fresh_rng() -> ChaCha20Rng {
    ChaCha20Rng::from_rng(OsRng)
        .unwrap_or_else(|err| panic!("system randomness source unavailable: {}", err))
}

/// Samples ternary polynomials with exactly `hamming_weight` non-zero
/// coefficients, each ±1 with equal probability.
#[derive(Clone)]
pub struct TernarySampler {
    rng: ChaCha20Rng,
    hamming_weight: usize,
}

impl TernarySampler {
    pub fn new(hamming_weight: usize) -> Self {
        Self::from_rng(hamming_weight, fresh_rng())
    }

    pub fn from_rng(hamming_weight: usize, rng: ChaCha20Rng) -> Self {
        Self { rng, hamming_weight }
    }

    pub fn hamming_weight(&self) -> usize {
        self.hamming_weight
    }

    /// Overwrites rows `0..=level` with a fresh ternary polynomial.
    ///
    /// # Panics
    ///
    /// Panics if the Hamming weight exceeds the ring dimension.
    pub fn read_lvl(&mut self, ring: &Ring, level: usize, p: &mut Poly) {
        p.zero_lvl(level);
        let positions = index::sample(&mut self.rng, p.n(), self.hamming_weight);
        for w in positions.iter() {
            let negative = self.rng.gen::<bool>();
            for (m, row) in ring.moduli()[..=level].iter().zip(p.rows_mut()) {
                row[w] = if negative { m.value() - 1 } else { 1 };
            }
        }
    }
}

/// Samples residues uniformly in [0, q_i) on every row independently.
#[derive(Clone)]
pub struct UniformSampler {
    rng: ChaCha20Rng,
}

impl UniformSampler {
    pub fn new() -> Self {
        Self::from_rng(fresh_rng())
    }

    pub fn from_rng(rng: ChaCha20Rng) -> Self {
        Self { rng }
    }

    pub fn read_lvl(&mut self, ring: &Ring, level: usize, p: &mut Poly) {
        for (m, row) in ring.moduli()[..=level].iter().zip(p.rows_mut()) {
            let q = m.value();
            row.iter_mut().for_each(|c| *c = self.rng.gen_range(0..q));
        }
    }
}

impl Default for UniformSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TernarySampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TernarySampler")
            .field("hamming_weight", &self.hamming_weight)
            .finish()
    }
}

impl std::fmt::Debug for UniformSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniformSampler").finish()
    }
}
