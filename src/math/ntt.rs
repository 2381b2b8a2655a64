//! Number-Theoretic Transform for negacyclic convolution.
//!
//! Implements Cooley-Tukey (forward) and Gentleman-Sande (inverse) radix-2
//! transforms over Z_q[X]/(X^n + 1) for a single prime q ≡ 1 (mod 2n).
//! Twiddle factors are stored in Montgomery form, so a butterfly costs one
//! Montgomery multiplication and coefficients stay in standard form on both
//! sides of the transform.

use super::modular::Modulus;

/// Precomputed twiddle factors for one prime of an RNS chain.
///
/// # Fields
///
/// * `n` - Ring dimension (power of two)
/// * `modulus` - The prime q with its Montgomery constants
/// * `psi_powers` - Forward twiddles (powers of ψ, bit-reversed, Montgomery form)
/// * `psi_inv_powers` - Inverse twiddles (powers of ψ^(-1))
/// * `n_inv` - n^(-1) mod q in Montgomery form
#[derive(Clone)]
pub struct NttTable {
    n: usize,
    modulus: Modulus,
    psi_powers: Vec<u64>,
    psi_inv_powers: Vec<u64>,
    n_inv: u64,
}

impl NttTable {
    /// Builds the table for dimension `n` and modulus `q`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not a power of two or `q` is not ≡ 1 (mod 2n).
    pub fn new(n: usize, modulus: Modulus) -> Self {
        assert!(n.is_power_of_two() && n >= 2, "n must be a power of two");
        let q = modulus.value();
        assert!(q % (2 * n as u64) == 1, "q must be ≡ 1 (mod 2n)");

        let psi = Self::find_primitive_root(2 * n as u64, &modulus);
        let psi_inv = modulus.pow(psi, q - 2);
        let n_inv = modulus.pow(n as u64, q - 2);

        Self {
            n,
            psi_powers: Self::compute_twiddle_factors(n, modulus.mform(psi), &modulus),
            psi_inv_powers: Self::compute_twiddle_factors(n, modulus.mform(psi_inv), &modulus),
            n_inv: modulus.mform(n_inv),
            modulus,
        }
    }

    pub fn dimension(&self) -> usize {
        self.n
    }

    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    /// Forward NTT in place.
    pub fn forward(&self, coeffs: &mut [u64]) {
        debug_assert_eq!(coeffs.len(), self.n, "Input length must match dimension");
        let n = self.n;
        let m_q = &self.modulus;

        let mut t = n;
        let mut m = 1;
        while m < n {
            t >>= 1;
            for i in 0..m {
                let j1 = 2 * i * t;
                let w = self.psi_powers[m + i];
                for j in j1..j1 + t {
                    let u = coeffs[j];
                    let v = m_q.mred(coeffs[j + t], w);
                    coeffs[j] = m_q.add(u, v);
                    coeffs[j + t] = m_q.sub(u, v);
                }
            }
            m <<= 1;
        }
    }

    /// Inverse NTT in place, including the n^(-1) scaling.
    pub fn inverse(&self, coeffs: &mut [u64]) {
        debug_assert_eq!(coeffs.len(), self.n, "Input length must match dimension");
        let n = self.n;
        let m_q = &self.modulus;

        let mut t = 1;
        let mut m = n;
        while m > 1 {
            m >>= 1;
            for i in 0..m {
                let j1 = i * 2 * t;
                let w = self.psi_inv_powers[m + i];
                for j in j1..j1 + t {
                    let u = coeffs[j];
                    let v = coeffs[j + t];
                    coeffs[j] = m_q.add(u, v);
                    coeffs[j + t] = m_q.mred(m_q.sub(u, v), w);
                }
            }
            t <<= 1;
        }

        for c in coeffs.iter_mut() {
            *c = m_q.mred(*c, self.n_inv);
        }
    }

    /// Finds a primitive 2n-th root of unity ψ, so that ψ^n = -1.
    fn find_primitive_root(two_n: u64, modulus: &Modulus) -> u64 {
        let q = modulus.value();
        let exp = (q - 1) / two_n;
        for g in 2..q {
            let candidate = modulus.pow(g, exp);
            if modulus.pow(candidate, two_n / 2) == q - 1 {
                return candidate;
            }
        }
        panic!("No primitive root found (should not happen for valid parameters)");
    }

    /// Twiddle factors in bit-reversed order, Montgomery form.
    fn compute_twiddle_factors(n: usize, psi_mont: u64, modulus: &Modulus) -> Vec<u64> {
        let one = modulus.mform(1);
        let mut factors = vec![0u64; n];
        factors[1] = one;

        for m in 1..n {
            if m.is_power_of_two() {
                let exp = n / (2 * m);
                let mut pow = one;
                for _ in 0..exp {
                    pow = modulus.mred(pow, psi_mont);
                }
                factors[m] = pow;
            } else {
                let prev_idx = m & (m - 1);
                let step_idx = m & m.wrapping_neg();
                factors[m] = modulus.mred(factors[prev_idx], factors[step_idx]);
            }
        }

        factors
    }
}

impl std::fmt::Debug for NttTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NttTable")
            .field("n", &self.n)
            .field("q", &self.modulus.value())
            .finish()
    }
}
