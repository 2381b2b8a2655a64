//! Polynomial arithmetic over one RNS modulus chain.
//!
//! A [`Ring`] owns the moduli q_0..q_L of a chain and one NTT table per
//! modulus. Every operation takes an explicit `level` and touches only rows
//! `0..=level`; rows above it are left as they are. Operations never check
//! domain tags. Feeding a coefficient-domain polynomial to an NTT-domain
//! product yields garbage, not an error.

use num_bigint::BigUint;

use super::crt::modulus_product;
use super::modular::Modulus;
use super::ntt::NttTable;
use super::poly::{Domain, Poly};

/// Moduli and NTT tables of one RNS chain.
pub struct Ring {
    n: usize,
    moduli: Vec<Modulus>,
    tables: Vec<NttTable>,
    modulus_bigint: BigUint,
}

impl Ring {
    /// Builds the chain for ring dimension `n`.
    ///
    /// # Panics
    ///
    /// Panics if `moduli` is empty or a modulus is not NTT-friendly for `n`.
    pub fn new(n: usize, moduli: &[u64]) -> Self {
        assert!(!moduli.is_empty(), "moduli must be non-empty");
        let moduli: Vec<Modulus> = moduli.iter().map(|&q| Modulus::new(q)).collect();
        let tables = moduli.iter().map(|&m| NttTable::new(n, m)).collect();
        let values: Vec<u64> = moduli.iter().map(Modulus::value).collect();

        Self {
            n,
            modulus_bigint: modulus_product(&values),
            moduli,
            tables,
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn moduli(&self) -> &[Modulus] {
        &self.moduli
    }

    pub fn max_level(&self) -> usize {
        self.moduli.len() - 1
    }

    /// Product of all moduli of the chain.
    pub fn modulus_bigint(&self) -> &BigUint {
        &self.modulus_bigint
    }

    pub fn new_poly(&self) -> Poly {
        Poly::zero(self.n, self.max_level())
    }

    pub fn new_poly_lvl(&self, level: usize) -> Poly {
        Poly::zero(self.n, level)
    }

    fn levels(&self, level: usize) -> &[Modulus] {
        &self.moduli[..=level]
    }

    /// Forward NTT of rows `0..=level`; tags the polynomial `Ntt`.
    pub fn ntt_lvl(&self, level: usize, p: &mut Poly) {
        for (table, row) in self.tables[..=level].iter().zip(p.rows_mut()) {
            table.forward(row);
        }
        p.set_domain(Domain::Ntt);
    }

    /// Inverse NTT of rows `0..=level`; tags the polynomial `Coeff`.
    pub fn inv_ntt_lvl(&self, level: usize, p: &mut Poly) {
        for (table, row) in self.tables[..=level].iter().zip(p.rows_mut()) {
            table.inverse(row);
        }
        p.set_domain(Domain::Coeff);
    }

    pub fn mform_lvl(&self, level: usize, p: &mut Poly) {
        for (m, row) in self.levels(level).iter().zip(p.rows_mut()) {
            row.iter_mut().for_each(|c| *c = m.mform(*c));
        }
    }

    pub fn inv_mform_lvl(&self, level: usize, p: &mut Poly) {
        for (m, row) in self.levels(level).iter().zip(p.rows_mut()) {
            row.iter_mut().for_each(|c| *c = m.inv_mform(*c));
        }
    }

    /// `acc += rhs`
    pub fn add_lvl(&self, level: usize, acc: &mut Poly, rhs: &Poly) {
        for ((m, a), b) in self.levels(level).iter().zip(acc.rows_mut()).zip(rhs.rows()) {
            for (x, &y) in a.iter_mut().zip(b) {
                *x = m.add(*x, y);
            }
        }
    }

    /// `acc -= rhs`
    pub fn sub_lvl(&self, level: usize, acc: &mut Poly, rhs: &Poly) {
        for ((m, a), b) in self.levels(level).iter().zip(acc.rows_mut()).zip(rhs.rows()) {
            for (x, &y) in a.iter_mut().zip(b) {
                *x = m.sub(*x, y);
            }
        }
    }

    pub fn neg_lvl(&self, level: usize, p: &mut Poly) {
        for (m, row) in self.levels(level).iter().zip(p.rows_mut()) {
            row.iter_mut().for_each(|c| *c = m.neg(*c));
        }
    }

    /// `out = a * b * R^(-1)` coefficient-wise.
    ///
    /// With `b` in Montgomery form, `out` is the plain product.
    pub fn mul_coeffs_montgomery_lvl(&self, level: usize, a: &Poly, b: &Poly, out: &mut Poly) {
        for (((m, x), y), z) in self
            .levels(level)
            .iter()
            .zip(a.rows())
            .zip(b.rows())
            .zip(out.rows_mut())
        {
            for ((&xa, &yb), zc) in x.iter().zip(y).zip(z.iter_mut()) {
                *zc = m.mred(xa, yb);
            }
        }
    }

    /// `acc += a * b * R^(-1)`
    pub fn mul_coeffs_montgomery_and_add_lvl(
        &self,
        level: usize,
        a: &Poly,
        b: &Poly,
        acc: &mut Poly,
    ) {
        for (((m, x), y), z) in self
            .levels(level)
            .iter()
            .zip(a.rows())
            .zip(b.rows())
            .zip(acc.rows_mut())
        {
            for ((&xa, &yb), zc) in x.iter().zip(y).zip(z.iter_mut()) {
                *zc = m.add(*zc, m.mred(xa, yb));
            }
        }
    }

    /// `acc -= a * b * R^(-1)`
    pub fn mul_coeffs_montgomery_and_sub_lvl(
        &self,
        level: usize,
        a: &Poly,
        b: &Poly,
        acc: &mut Poly,
    ) {
        for (((m, x), y), z) in self
            .levels(level)
            .iter()
            .zip(a.rows())
            .zip(b.rows())
            .zip(acc.rows_mut())
        {
            for ((&xa, &yb), zc) in x.iter().zip(y).zip(z.iter_mut()) {
                *zc = m.sub(*zc, m.mred(xa, yb));
            }
        }
    }

    /// `p *= scalar` on each row, the scalar reduced per modulus.
    pub fn mul_scalar_lvl(&self, level: usize, p: &mut Poly, scalar: u64) {
        for (m, row) in self.levels(level).iter().zip(p.rows_mut()) {
            let s = m.mform(m.reduce(scalar));
            row.iter_mut().for_each(|c| *c = m.mred(*c, s));
        }
    }

    /// `out = input * scalar` for a big-integer scalar reduced per modulus.
    pub fn mul_scalar_bigint_lvl(
        &self,
        level: usize,
        input: &Poly,
        scalar: &BigUint,
        out: &mut Poly,
    ) {
        for ((m, src), dst) in self.levels(level).iter().zip(input.rows()).zip(out.rows_mut()) {
            let reduced = scalar % m.value();
            let s = m.mform(reduced.to_u64_digits().first().copied().unwrap_or(0));
            for (d, &c) in dst.iter_mut().zip(src) {
                *d = m.mred(c, s);
            }
        }
    }

    /// Copies rows `0..=level` of `src` into `dst`, along with the domain tag.
    pub fn copy_lvl(&self, level: usize, src: &Poly, dst: &mut Poly) {
        for (d, s) in dst.rows_mut()[..=level].iter_mut().zip(src.rows()) {
            d.copy_from_slice(s);
        }
        dst.set_domain(src.domain());
    }

    /// Largest centered magnitude over rows `0..=level`.
    pub fn linf_norm_lvl(&self, level: usize, p: &Poly) -> u64 {
        self.levels(level)
            .iter()
            .zip(p.rows())
            .flat_map(|(m, row)| row.iter().map(move |&c| m.to_signed(c).unsigned_abs()))
            .max()
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for Ring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ring")
            .field("n", &self.n)
            .field(
                "moduli",
                &self.moduli.iter().map(Modulus::value).collect::<Vec<_>>(),
            )
            .finish()
    }
}
