//! The extended ring over Q∪P.
//!
//! Encryption steps that flood noise at a larger modulus work on a
//! [`PolyQP`]: one polynomial over the ciphertext chain Q and an optional one
//! over the auxiliary chain P. `None` stands for "no auxiliary modulus", and
//! every [`RingQP`] operation silently skips the P half when either the ring,
//! the level or the operand lacks it.

use serde::{Deserialize, Serialize};

use super::poly::{Domain, Poly};
use super::ring::Ring;

/// A polynomial held over Q and, optionally, over P.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolyQP {
    pub q: Poly,
    pub p: Option<Poly>,
}

impl PolyQP {
    pub fn new(q: Poly, p: Option<Poly>) -> Self {
        Self { q, p }
    }

    pub fn level_q(&self) -> usize {
        self.q.level()
    }

    pub fn level_p(&self) -> Option<usize> {
        self.p.as_ref().map(Poly::level)
    }

    pub fn n(&self) -> usize {
        self.q.n()
    }

    pub fn set_domain(&mut self, domain: Domain) {
        self.q.set_domain(domain);
        if let Some(p) = self.p.as_mut() {
            p.set_domain(domain);
        }
    }
}

/// Ring contexts for the Q chain and the optional P chain.
#[derive(Debug)]
pub struct RingQP {
    ring_q: Ring,
    ring_p: Option<Ring>,
}

macro_rules! for_p {
    ($self:ident, $level_p:ident, |$ring:ident, $lp:ident| $body:expr) => {
        if let (Some($ring), Some($lp)) = ($self.ring_p.as_ref(), $level_p) {
            $body
        }
    };
}

impl RingQP {
    pub fn new(ring_q: Ring, ring_p: Option<Ring>) -> Self {
        Self { ring_q, ring_p }
    }

    pub fn ring_q(&self) -> &Ring {
        &self.ring_q
    }

    pub fn ring_p(&self) -> Option<&Ring> {
        self.ring_p.as_ref()
    }

    /// Zero polynomial at full levels.
    pub fn new_poly(&self) -> PolyQP {
        PolyQP::new(self.ring_q.new_poly(), self.ring_p.as_ref().map(Ring::new_poly))
    }

    /// Zero polynomial with `level_q + 1` Q rows and, when both `level_p` and
    /// P exist, `level_p + 1` P rows.
    pub fn new_poly_lvl(&self, level_q: usize, level_p: Option<usize>) -> PolyQP {
        let p = match (self.ring_p.as_ref(), level_p) {
            (Some(ring_p), Some(lp)) => Some(ring_p.new_poly_lvl(lp)),
            _ => None,
        };
        PolyQP::new(self.ring_q.new_poly_lvl(level_q), p)
    }

    pub fn ntt_lvl(&self, level_q: usize, level_p: Option<usize>, p: &mut PolyQP) {
        self.ring_q.ntt_lvl(level_q, &mut p.q);
        for_p!(self, level_p, |ring_p, lp| if let Some(pp) = p.p.as_mut() {
            ring_p.ntt_lvl(lp, pp)
        });
    }

    pub fn inv_ntt_lvl(&self, level_q: usize, level_p: Option<usize>, p: &mut PolyQP) {
        self.ring_q.inv_ntt_lvl(level_q, &mut p.q);
        for_p!(self, level_p, |ring_p, lp| if let Some(pp) = p.p.as_mut() {
            ring_p.inv_ntt_lvl(lp, pp)
        });
    }

    pub fn mform_lvl(&self, level_q: usize, level_p: Option<usize>, p: &mut PolyQP) {
        self.ring_q.mform_lvl(level_q, &mut p.q);
        for_p!(self, level_p, |ring_p, lp| if let Some(pp) = p.p.as_mut() {
            ring_p.mform_lvl(lp, pp)
        });
    }

    pub fn inv_mform_lvl(&self, level_q: usize, level_p: Option<usize>, p: &mut PolyQP) {
        self.ring_q.inv_mform_lvl(level_q, &mut p.q);
        for_p!(self, level_p, |ring_p, lp| if let Some(pp) = p.p.as_mut() {
            ring_p.inv_mform_lvl(lp, pp)
        });
    }

    /// `acc += rhs`
    pub fn add_lvl(&self, level_q: usize, level_p: Option<usize>, acc: &mut PolyQP, rhs: &PolyQP) {
        self.ring_q.add_lvl(level_q, &mut acc.q, &rhs.q);
        for_p!(self, level_p, |ring_p, lp| if let (Some(a), Some(b)) =
            (acc.p.as_mut(), rhs.p.as_ref())
        {
            ring_p.add_lvl(lp, a, b)
        });
    }

    /// `out = a * b * R^(-1)`
    pub fn mul_coeffs_montgomery_lvl(
        &self,
        level_q: usize,
        level_p: Option<usize>,
        a: &PolyQP,
        b: &PolyQP,
        out: &mut PolyQP,
    ) {
        self.ring_q.mul_coeffs_montgomery_lvl(level_q, &a.q, &b.q, &mut out.q);
        for_p!(self, level_p, |ring_p, lp| if let (Some(x), Some(y), Some(z)) =
            (a.p.as_ref(), b.p.as_ref(), out.p.as_mut())
        {
            ring_p.mul_coeffs_montgomery_lvl(lp, x, y, z)
        });
    }

    /// `acc -= a * b * R^(-1)`
    pub fn mul_coeffs_montgomery_and_sub_lvl(
        &self,
        level_q: usize,
        level_p: Option<usize>,
        a: &PolyQP,
        b: &PolyQP,
        acc: &mut PolyQP,
    ) {
        self.ring_q
            .mul_coeffs_montgomery_and_sub_lvl(level_q, &a.q, &b.q, &mut acc.q);
        for_p!(self, level_p, |ring_p, lp| if let (Some(x), Some(y), Some(z)) =
            (a.p.as_ref(), b.p.as_ref(), acc.p.as_mut())
        {
            ring_p.mul_coeffs_montgomery_and_sub_lvl(lp, x, y, z)
        });
    }

    /// Lifts a small-norm coefficient-domain polynomial from Q into P.
    ///
    /// The residue at q_0 is centered in (-q_0/2, q_0/2] and reduced modulo
    /// every p_j up to `level_p`. Only correct when the underlying integer
    /// is smaller than q_0/2 in absolute value.
    pub fn extend_basis_small_norm_and_center(&self, p_q: &Poly, level_p: usize, p_p: &mut Poly) {
        let Some(ring_p) = self.ring_p.as_ref() else {
            return;
        };
        let q0 = self.ring_q.moduli()[0].value();
        let half = q0 >> 1;

        for (m, row) in ring_p.moduli()[..=level_p].iter().zip(p_p.rows_mut()) {
            for (dst, &c) in row.iter_mut().zip(p_q.row(0)) {
                *dst = if c > half {
                    m.neg(m.reduce(q0 - c))
                } else {
                    m.reduce(c)
                };
            }
        }
    }
}
