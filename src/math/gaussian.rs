//! Discrete Gaussian sampling
//!
//! Provides samplers for discrete Gaussian distributions over Z,
//! used for generating error terms in lattice-based cryptography.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use super::poly::Poly;
use super::ring::Ring;
use super::sampling::fresh_rng;

/// Default Gaussian standard deviation
pub const DEFAULT_SIGMA: f64 = 3.19;

/// Discrete Gaussian sampler over Z using rejection sampling
#[derive(Clone)]
pub struct GaussianSampler {
    /// Standard deviation σ
    sigma: f64,
    /// Tailcut: reject samples beyond this many standard deviations
    tailcut: usize,
    /// RNG for sampling
    rng: ChaCha20Rng,
}

impl GaussianSampler {
    /// Create a new Gaussian sampler seeded from the operating system
    pub fn new(sigma: f64) -> Self {
        Self::from_rng(sigma, fresh_rng())
    }

    /// Create a new Gaussian sampler with given seed for deterministic sampling
    pub fn with_seed(sigma: f64, seed: u64) -> Self {
        Self::from_rng(sigma, ChaCha20Rng::seed_from_u64(seed))
    }

    pub fn from_rng(sigma: f64, rng: ChaCha20Rng) -> Self {
        Self {
            sigma,
            tailcut: (sigma * 6.0).ceil() as usize,
            rng,
        }
    }

    /// Get the standard deviation
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Sample a single value from the discrete Gaussian D_σ
    /// Returns a signed integer in centered representation
    pub fn sample(&mut self) -> i64 {
        let sigma_sq_2 = 2.0 * self.sigma * self.sigma;
        let bound = self.tailcut as i64;

        loop {
            let x = self.rng.gen_range(-bound..=bound);

            // Accept with probability proportional to exp(-x²/(2σ²))
            let prob = (-((x * x) as f64) / sigma_sq_2).exp();
            let u: f64 = self.rng.gen();
            if u < prob {
                return x;
            }
        }
    }

    /// Overwrites rows `0..=level` with one Gaussian polynomial, the same
    /// integer written into every residue row.
    pub fn read_lvl(&mut self, ring: &Ring, level: usize, p: &mut Poly) {
        for w in 0..p.n() {
            let e = self.sample();
            for (m, row) in ring.moduli()[..=level].iter().zip(p.rows_mut()) {
                row[w] = m.from_signed(e);
            }
        }
    }

    /// Adds a fresh Gaussian polynomial to rows `0..=level`.
    pub fn read_and_add_lvl(&mut self, ring: &Ring, level: usize, p: &mut Poly) {
        for w in 0..p.n() {
            let e = self.sample();
            for (m, row) in ring.moduli()[..=level].iter().zip(p.rows_mut()) {
                row[w] = m.add(row[w], m.from_signed(e));
            }
        }
    }
}

impl std::fmt::Debug for GaussianSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaussianSampler")
            .field("sigma", &self.sigma)
            .field("tailcut", &self.tailcut)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: [u64; 2] = [36028797014376449, 36028797013327873];

    #[test]
    fn test_tailcut_bounds() {
        let mut sampler = GaussianSampler::new(DEFAULT_SIGMA);
        let tailcut_bound = (6.0 * DEFAULT_SIGMA).ceil() as i64;

        for _ in 0..100_000 {
            let s = sampler.sample();
            assert!(
                s.abs() <= tailcut_bound,
                "Sample {} exceeds 6σ bound of {}",
                s,
                tailcut_bound
            );
        }
    }

    #[test]
    fn test_deterministic_seeding() {
        let mut sampler1 = GaussianSampler::with_seed(DEFAULT_SIGMA, 12345);
        let mut sampler2 = GaussianSampler::with_seed(DEFAULT_SIGMA, 12345);

        for _ in 0..100 {
            assert_eq!(sampler1.sample(), sampler2.sample());
        }
    }

    #[test]
    fn test_entropy_seeded_samplers_differ() {
        let mut sampler1 = GaussianSampler::new(DEFAULT_SIGMA);
        let mut sampler2 = GaussianSampler::new(DEFAULT_SIGMA);

        let samples1: Vec<i64> = (0..100).map(|_| sampler1.sample()).collect();
        let samples2: Vec<i64> = (0..100).map(|_| sampler2.sample()).collect();

        assert_ne!(samples1, samples2);
    }

    #[test]
    fn test_distribution_mean_and_variance() {
        let mut sampler = GaussianSampler::with_seed(DEFAULT_SIGMA, 42);
        let n = 100_000;

        let samples: Vec<i64> = (0..n).map(|_| sampler.sample()).collect();
        let mean: f64 = samples.iter().map(|&x| x as f64).sum::<f64>() / n as f64;
        let variance: f64 = samples
            .iter()
            .map(|&x| (x as f64 - mean).powi(2))
            .sum::<f64>()
            / n as f64;

        assert!(mean.abs() < 0.1, "Mean {} is too far from 0", mean);

        let expected_variance = DEFAULT_SIGMA * DEFAULT_SIGMA;
        let relative_error = (variance - expected_variance).abs() / expected_variance;
        assert!(
            relative_error < 0.1,
            "Variance {} differs from expected {} by {:.1}%",
            variance,
            expected_variance,
            relative_error * 100.0
        );
    }

    #[test]
    fn test_read_lvl_is_consistent_across_residues() {
        let ring = Ring::new(64, &Q);
        let mut sampler = GaussianSampler::with_seed(DEFAULT_SIGMA, 9);
        let mut p = ring.new_poly();
        sampler.read_lvl(&ring, 1, &mut p);

        let (m0, m1) = (&ring.moduli()[0], &ring.moduli()[1]);
        for w in 0..64 {
            assert_eq!(m0.to_signed(p.row(0)[w]), m1.to_signed(p.row(1)[w]));
        }
        assert!(ring.linf_norm_lvl(1, &p) <= (6.0 * DEFAULT_SIGMA).ceil() as u64);
    }

    #[test]
    fn test_read_and_add_accumulates() {
        let ring = Ring::new(64, &Q);
        let mut sampler = GaussianSampler::with_seed(DEFAULT_SIGMA, 10);
        let mut p = ring.new_poly();
        sampler.read_and_add_lvl(&ring, 0, &mut p);
        sampler.read_and_add_lvl(&ring, 0, &mut p);
        assert!(ring.linf_norm_lvl(0, &p) <= 2 * (6.0 * DEFAULT_SIGMA).ceil() as u64);
        assert!(p.row(1).iter().all(|&c| c == 0));
    }
}
