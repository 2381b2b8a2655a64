//! Secret-key decryption to the noisy plaintext m + e.

use super::types::{Ciphertext, Plaintext, SecretKey};
use crate::math::{Domain, Poly};
use crate::params::Parameters;

/// Computes c0 + c1·s over Q.
///
/// Decoding the result into application data is left to the caller.
#[derive(Debug)]
pub struct Decryptor<'k> {
    params: Parameters,
    sk: &'k SecretKey,
    buffer: Poly,
}

impl<'k> Decryptor<'k> {
    /// # Panics
    ///
    /// Panics if the key's ring degree differs from the parameters'.
    pub fn new(params: &Parameters, sk: &'k SecretKey) -> Self {
        assert!(
            sk.ring_dim() == params.n(),
            "cannot bind decryptor: secret key degree does not match ring degree {}",
            params.n()
        );
        Self {
            params: params.clone(),
            sk,
            buffer: params.ring_q().new_poly(),
        }
    }

    /// Writes c0 + c1·s into `pt`, in the coefficient domain and at
    /// `min(ct.level(), pt.level())`.
    pub fn decrypt(&mut self, ct: &Ciphertext, pt: &mut Plaintext) {
        let ring_q = self.params.ring_q();
        let level = ct.level().min(pt.level());
        let [c0, c1] = &ct.value;
        let out = &mut pt.value;

        if ct.is_ntt() {
            ring_q.mul_coeffs_montgomery_lvl(level, c1, &self.sk.value.q, out);
            ring_q.add_lvl(level, out, c0);
            ring_q.inv_ntt_lvl(level, out);
        } else {
            ring_q.copy_lvl(level, c1, &mut self.buffer);
            ring_q.ntt_lvl(level, &mut self.buffer);
            ring_q.mul_coeffs_montgomery_lvl(level, &self.buffer, &self.sk.value.q, out);
            ring_q.inv_ntt_lvl(level, out);
            ring_q.add_lvl(level, out, c0);
        }

        out.truncate(level);
        out.set_domain(Domain::Coeff);
    }

    pub fn decrypt_new(&mut self, ct: &Ciphertext) -> Plaintext {
        let mut pt = Plaintext::new(&self.params, ct.level());
        self.decrypt(ct, &mut pt);
        pt
    }
}
