//! Secret and public key generation.

use tracing::debug;

use super::enc::EncryptorCore;
use super::types::{PublicKey, SecretKey};
use crate::math::PolyQP;
use crate::params::Parameters;

/// Generates RLWE key material for one parameter set.
///
/// Owns its own samplers; one generator per thread.
#[derive(Debug)]
pub struct KeyGenerator {
    core: EncryptorCore,
}

impl KeyGenerator {
    pub fn new(params: &Parameters) -> Self {
        Self {
            core: EncryptorCore::new(params),
        }
    }

    /// Ternary secret with the parameters' Hamming weight, over Q and P, in
    /// the NTT domain and Montgomery form.
    pub fn gen_secret_key(&mut self) -> SecretKey {
        let params = &self.core.params;
        let ring_qp = params.ring_qp();
        let level_q = params.max_level_q();
        let level_p = params.max_level_p();

        let mut s = ring_qp.new_poly();
        self.core
            .samplers
            .ternary
            .read_lvl(ring_qp.ring_q(), level_q, &mut s.q);
        if let (Some(lp), Some(sp)) = (level_p, s.p.as_mut()) {
            ring_qp.extend_basis_small_norm_and_center(&s.q, lp, sp);
        }
        ring_qp.ntt_lvl(level_q, level_p, &mut s);
        ring_qp.mform_lvl(level_q, level_p, &mut s);

        debug!(h = params.h(), "generated secret key");
        SecretKey::from_poly(s)
    }

    /// Public key (pk0, pk1) = (-pk1·s + e, pk1) over Q and P, in the NTT
    /// domain.
    pub fn gen_public_key(&mut self, sk: &SecretKey) -> PublicKey {
        let params = self.core.params.clone();
        let level_q = params.max_level_q();
        let level_p = params.max_level_p();

        let mut pk0: PolyQP = params.ring_qp().new_poly();
        let mut pk1: PolyQP = params.ring_qp().new_poly();
        self.core
            .encrypt_zero_symmetric_qp(level_q, level_p, &sk.value, true, true, &mut pk0, &mut pk1);

        debug!("generated public key");
        PublicKey::from_parts(pk0, pk1)
    }

    pub fn gen_key_pair(&mut self) -> (SecretKey, PublicKey) {
        let sk = self.gen_secret_key();
        let pk = self.gen_public_key(&sk);
        (sk, pk)
    }
}
