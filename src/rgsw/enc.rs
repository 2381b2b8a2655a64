//! Secret-key RGSW encryption.

use std::mem;

use tracing::trace;

use super::types::RgswCiphertext;
use crate::rlwe::{EncryptionKey, Encryptor, Plaintext};

impl Encryptor<'_> {
    /// Encrypts `pt` (or zero when `None`) into the gadget grid `ct`.
    ///
    /// The levels and grid shape come from `ct`. Positions of RNS digit i
    /// cover Q residues `i·(level_p+1) .. (i+1)·(level_p+1)`; residues past
    /// `level_q` are skipped, so when the P count does not divide the Q count
    /// the last digit receives only part of the plaintext.
    ///
    /// # Panics
    ///
    /// Panics if the encryptor is bound to a public key.
    pub fn encrypt_rgsw(&mut self, pt: Option<&Plaintext>, ct: &mut RgswCiphertext) {
        let sk = match self.key() {
            EncryptionKey::Secret(sk) => sk,
            EncryptionKey::Public(_) => panic!("RGSW encryption requires a secret key"),
        };

        let core = &mut self.core;
        let params = core.params.clone();
        let ring_q = params.ring_q();
        let ring_qp = params.ring_qp();
        let level_q = ct.level_q();
        let level_p = ct.level_p();
        trace!(level_q, ?level_p, "encrypt rgsw");

        let mut pt_times_p = mem::take(&mut core.buffers.pool_q[1]);
        if let Some(pt) = pt {
            match level_p {
                Some(lp) => {
                    ring_q.mul_scalar_bigint_lvl(
                        level_q,
                        &pt.value,
                        &params.p_product(lp),
                        &mut pt_times_p,
                    );
                    if !pt.is_ntt() {
                        ring_q.ntt_lvl(level_q, &mut pt_times_p);
                    }
                }
                None => {
                    ring_q.copy_lvl(level_q, &pt.value, &mut pt_times_p);
                    if !pt.is_ntt() {
                        ring_q.ntt_lvl(level_q, &mut pt_times_p);
                    }
                }
            }
        }

        let digit_width = level_p.map_or(1, |lp| lp + 1);
        let moduli = ring_q.moduli();

        for j in 0..ct.decomp_bit() {
            for i in 0..ct.decomp_rns() {
                let [row0, row1] = &mut ct.value[i][j];
                for row in [&mut *row0, &mut *row1] {
                    let [a, b] = row;
                    core.encrypt_zero_symmetric_qp(level_q, level_p, &sk.value, true, true, a, b);
                }

                if pt.is_some() {
                    for k in 0..digit_width {
                        let index = i * digit_width + k;
                        if index > level_q {
                            break;
                        }
                        let m = &moduli[index];
                        let src = pt_times_p.row(index);
                        for dst in [row0[0].q.row_mut(index), row1[1].q.row_mut(index)] {
                            for (d, &s) in dst.iter_mut().zip(src) {
                                *d = m.add(*d, s);
                            }
                        }
                    }
                }

                for entry in row0.iter_mut().chain(row1.iter_mut()) {
                    ring_qp.mform_lvl(level_q, level_p, entry);
                }
            }

            ring_q.mul_scalar_lvl(level_q, &mut pt_times_p, 1 << params.log_base2());
        }

        core.buffers.pool_q[1] = pt_times_p;
    }
}
