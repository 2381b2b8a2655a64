//! RNS polynomials over Z_Q[X]/(X^n + 1).
//!
//! A [`Poly`] stores one row of `n` residues per active modulus of its chain,
//! so row `i` holds the polynomial reduced modulo `q_i`. The number of rows
//! is the polynomial's level plus one; chains are always truncated from the
//! top. Every polynomial carries a [`Domain`] tag saying whether its rows
//! hold coefficients or NTT evaluations.
//!
//! Arithmetic lives on [`Ring`](super::ring::Ring), which owns the moduli and
//! NTT tables. A `Poly` is plain data.

use serde::{Deserialize, Serialize};

/// Representation of a polynomial's residues.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    /// Plain coefficients.
    #[default]
    Coeff,
    /// Evaluations at the odd powers of a 2n-th root of unity.
    Ntt,
}

/// Polynomial in RNS representation.
///
/// # Fields
///
/// * `coeffs` - One row of `n` residues per active modulus
/// * `domain` - Coefficient or NTT representation
///
/// # Example
///
/// ```
/// use bfv_rlwe::math::{Domain, Poly};
///
/// let mut p = Poly::zero(8, 2);
/// assert_eq!(p.level(), 2);
/// p.truncate(0);
/// assert_eq!(p.level(), 0);
/// assert_eq!(p.domain(), Domain::Coeff);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poly {
    coeffs: Vec<Vec<u64>>,
    domain: Domain,
}

impl Poly {
    /// Zero polynomial of dimension `n` with `level + 1` residue rows.
    pub fn zero(n: usize, level: usize) -> Self {
        Self {
            coeffs: vec![vec![0u64; n]; level + 1],
            domain: Domain::Coeff,
        }
    }

    /// Wraps already-reduced residue rows.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs` is empty or the rows have different lengths.
    pub fn from_rows(coeffs: Vec<Vec<u64>>, domain: Domain) -> Self {
        assert!(!coeffs.is_empty(), "polynomial needs at least one residue row");
        let n = coeffs[0].len();
        assert!(
            coeffs.iter().all(|row| row.len() == n),
            "residue rows must share one dimension"
        );
        Self { coeffs, domain }
    }

    /// Ring dimension, 0 for the empty placeholder.
    pub fn n(&self) -> usize {
        self.coeffs.first().map_or(0, Vec::len)
    }

    /// Index of the highest active modulus.
    pub fn level(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn is_ntt(&self) -> bool {
        self.domain == Domain::Ntt
    }

    pub fn set_domain(&mut self, domain: Domain) {
        self.domain = domain;
    }

    pub fn row(&self, i: usize) -> &[u64] {
        &self.coeffs[i]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [u64] {
        &mut self.coeffs[i]
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.coeffs
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<u64>] {
        &mut self.coeffs
    }

    /// Drops the residue rows above `level`.
    pub fn truncate(&mut self, level: usize) {
        self.coeffs.truncate(level + 1);
    }

    /// Sets the rows up to `level` to zero.
    pub fn zero_lvl(&mut self, level: usize) {
        for row in &mut self.coeffs[..=level] {
            row.fill(0);
        }
    }

    /// Copies the residues of `other` into `self` on their common rows,
    /// leaving the domain tag untouched.
    pub fn copy_values_from(&mut self, other: &Poly) {
        for (dst, src) in self.coeffs.iter_mut().zip(&other.coeffs) {
            dst.copy_from_slice(src);
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|row| row.iter().all(|&c| c == 0))
    }
}
