//! RNS basis contraction from Q∪P down to Q.
//!
//! [`BasisExtender::mod_down_qp_to_q`] takes a value x held redundantly over
//! Q and P and replaces its Q residues with those of floor(x / P). It runs a
//! fast base conversion of [x]_P into Q, with the overflow count α
//! recovered in floating point:
//!
//! ```text
//! y_k   = [x]_{p_k} * (P/p_k)^(-1) mod p_k
//! α     = floor(Σ y_k / p_k)
//! [x]_P = Σ y_k * (P/p_k) - α * P
//! out_i = (x_i - [x]_P mod q_i) * P^(-1) mod q_i
//! ```
//!
//! The precomputed tables depend only on the chains and are shared behind an
//! [`Arc`], so shallow copies only allocate their own scratch row.

use std::sync::Arc;

use super::crt::{mod_inverse, punctured_product_mod};
use super::modular::Modulus;
use super::poly::Poly;
use super::ring_qp::RingQP;

/// Constants for one P level.
#[derive(Debug)]
struct ModDownTable {
    /// (P / p_k)^(-1) mod p_k, in Montgomery form
    p_hat_inv_mod_p: Vec<u64>,
    /// (P / p_k) mod q_i, indexed [k][i], in Montgomery form
    p_hat_mod_q: Vec<Vec<u64>>,
    /// P mod q_i, in Montgomery form
    p_mod_q: Vec<u64>,
    /// P^(-1) mod q_i, in Montgomery form
    p_inv_mod_q: Vec<u64>,
}

#[derive(Debug)]
struct BasisTables {
    q: Vec<Modulus>,
    p: Vec<Modulus>,
    /// Indexed by level_p.
    mod_down: Vec<ModDownTable>,
}

/// Mod-down helper for one Q∪P pair of chains.
#[derive(Debug)]
pub struct BasisExtender {
    tables: Arc<BasisTables>,
    scratch: Vec<u64>,
}

impl BasisExtender {
    /// Precomputes the conversion constants for every P level.
    ///
    /// # Panics
    ///
    /// Panics if the ring has no P chain.
    pub fn new(ring_qp: &RingQP) -> Self {
        let ring_p = ring_qp
            .ring_p()
            .unwrap_or_else(|| panic!("basis extension needs an auxiliary modulus chain"));
        let q: Vec<Modulus> = ring_qp.ring_q().moduli().to_vec();
        let p: Vec<Modulus> = ring_p.moduli().to_vec();
        let p_values: Vec<u64> = p.iter().map(Modulus::value).collect();

        let mod_down = (0..p.len())
            .map(|level_p| Self::mod_down_table(&q, &p, &p_values[..=level_p]))
            .collect();

        Self {
            scratch: vec![0u64; p.len()],
            tables: Arc::new(BasisTables { q, p, mod_down }),
        }
    }

    fn mod_down_table(q: &[Modulus], p: &[Modulus], active: &[u64]) -> ModDownTable {
        let p_hat_inv_mod_p = active
            .iter()
            .enumerate()
            .map(|(k, &p_k)| {
                let m = &p[k];
                let hat = punctured_product_mod(active, k, p_k);
                m.mform(mod_inverse(hat, p_k))
            })
            .collect();

        let p_hat_mod_q = (0..active.len())
            .map(|k| {
                q.iter()
                    .map(|m| m.mform(punctured_product_mod(active, k, m.value())))
                    .collect()
            })
            .collect();

        let p_mod_q: Vec<u64> = q
            .iter()
            .map(|m| punctured_product_mod(active, usize::MAX, m.value()))
            .collect();

        let p_inv_mod_q = q
            .iter()
            .zip(&p_mod_q)
            .map(|(m, &pm)| m.mform(mod_inverse(pm, m.value())))
            .collect();

        ModDownTable {
            p_hat_inv_mod_p,
            p_hat_mod_q,
            p_mod_q: q.iter().zip(&p_mod_q).map(|(m, &v)| m.mform(v)).collect(),
            p_inv_mod_q,
        }
    }

    /// New extender sharing the read-only tables, with its own scratch.
    pub fn shallow_copy(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            scratch: vec![0u64; self.scratch.len()],
        }
    }

    /// Replaces rows `0..=level_q` of `p_q` with floor(x / P), where x is
    /// given by `p_q` over Q and `p_p` over `P[0..=level_p]`.
    ///
    /// Both inputs must be in the coefficient domain. The result is exact
    /// unless Σ y_k / p_k falls within floating-point error of an integer,
    /// in which case it is off by one.
    pub fn mod_down_qp_to_q(&mut self, level_q: usize, level_p: usize, p_q: &mut Poly, p_p: &Poly) {
        let tables = &*self.tables;
        let table = &tables.mod_down[level_p];
        let p_moduli = &tables.p[..=level_p];
        let q_moduli = &tables.q[..=level_q];
        let y = &mut self.scratch[..=level_p];

        for w in 0..p_q.n() {
            let mut frac = 0f64;
            for (k, m) in p_moduli.iter().enumerate() {
                y[k] = m.mred(p_p.row(k)[w], table.p_hat_inv_mod_p[k]);
                frac += y[k] as f64 / m.value() as f64;
            }
            let alpha = frac.floor() as u64;

            for (i, m) in q_moduli.iter().enumerate() {
                let mut x_mod_p = 0u64;
                for (k, &yk) in y.iter().enumerate() {
                    x_mod_p = m.add(x_mod_p, m.mred(m.reduce(yk), table.p_hat_mod_q[k][i]));
                }
                x_mod_p = m.sub(x_mod_p, m.mred(alpha, table.p_mod_q[i]));

                let row = p_q.row_mut(i);
                row[w] = m.mred(m.sub(row[w], x_mod_p), table.p_inv_mod_q[i]);
            }
        }
    }
}
