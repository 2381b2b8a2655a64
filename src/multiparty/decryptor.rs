//! Partial decryption shares and their merge into a plaintext.

use tracing::{debug, trace};

use crate::math::{GaussianSampler, Poly};
use crate::params::Parameters;
use crate::rlwe::{Plaintext, SecretKey};

/// Partial decryption under secret-key fragments and merging of the shares.
///
/// Each participant computes `c1·s_i + e_i` with its own fragment s_i; the
/// holder of c0 adds all shares to obtain `c0 + c1·Σ s_i + Σ e_i`. No party
/// ever holds the combined secret.
#[derive(Debug)]
pub struct MultipartyDecryptor {
    params: Parameters,
    gaussian: GaussianSampler,
    buffer: Poly,
}

impl MultipartyDecryptor {
    pub fn new(params: &Parameters) -> Self {
        debug!(n = params.n(), "built multiparty decryptor");
        Self {
            params: params.clone(),
            gaussian: GaussianSampler::new(params.sigma()),
            buffer: params.ring_q().new_poly(),
        }
    }

    /// Share `ct·sk + e` for one fragment, at the level and in the domain of
    /// `ct`. The noise is sampled fresh on every call.
    ///
    /// # Panics
    ///
    /// Panics if `sk` has a different ring degree than `ct`.
    pub fn partial_decrypt(&mut self, ct: &Poly, sk: &SecretKey) -> Poly {
        assert!(
            sk.ring_dim() == ct.n(),
            "cannot partially decrypt: key degree {} does not match ciphertext degree {}",
            sk.ring_dim(),
            ct.n()
        );
        let ring_q = self.params.ring_q();
        let level = ct.level();
        trace!(level, domain = ?ct.domain(), "partial decrypt");

        let mut share = ring_q.new_poly_lvl(level);
        if ct.is_ntt() {
            ring_q.mul_coeffs_montgomery_lvl(level, ct, &sk.value.q, &mut share);
            self.gaussian.read_lvl(ring_q, level, &mut self.buffer);
            ring_q.ntt_lvl(level, &mut self.buffer);
            ring_q.add_lvl(level, &mut share, &self.buffer);
        } else {
            ring_q.copy_lvl(level, ct, &mut self.buffer);
            ring_q.ntt_lvl(level, &mut self.buffer);
            ring_q.mul_coeffs_montgomery_lvl(level, &self.buffer, &sk.value.q, &mut share);
            ring_q.inv_ntt_lvl(level, &mut share);
            self.gaussian.read_and_add_lvl(ring_q, level, &mut share);
        }
        share.set_domain(ct.domain());
        share
    }

    /// `c0 + Σ shares` as a plaintext at the level and in the domain of `c0`.
    ///
    /// Shares are not counted or checked: a missing or extra share yields a
    /// wrong plaintext, not an error.
    pub fn merge(&self, c0: &Poly, shares: &[Poly]) -> Plaintext {
        let ring_q = self.params.ring_q();
        let level = c0.level();
        let mut acc = c0.clone();
        for share in shares {
            ring_q.add_lvl(level, &mut acc, share);
        }
        trace!(level, shares = shares.len(), "merged shares");
        Plaintext::from_poly(acc)
    }
}
