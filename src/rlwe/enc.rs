//! RLWE encryption under a public or a secret key.
//!
//! An [`Encryptor`] pairs per-instance state (samplers, scratch buffers and a
//! basis extender) with one borrowed key. The state is mutated on every call,
//! so an instance is single-threaded; [`Encryptor::shallow_copy`] and
//! [`Encryptor::with_key`] hand out independent instances that share the
//! parameters, the key and the basis-extension tables.
//!
//! The destination ciphertext's second component decides the output domain:
//! whatever tag `c1` carries on entry is the tag both components carry on
//! exit. The working level is the smaller of the plaintext's and the
//! ciphertext's, and the ciphertext is truncated to it.

use std::mem;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing::{debug, trace};

use super::types::{Ciphertext, Plaintext, PublicKey, SecretKey};
use crate::math::{
    fresh_rng, BasisExtender, Domain, GaussianSampler, Poly, PolyQP, TernarySampler,
    UniformSampler,
};
use crate::params::Parameters;

/// The key an [`Encryptor`] is bound to.
#[derive(Clone, Copy, Debug)]
pub enum EncryptionKey<'k> {
    Public(&'k PublicKey),
    Secret(&'k SecretKey),
}

impl<'k> From<&'k PublicKey> for EncryptionKey<'k> {
    fn from(pk: &'k PublicKey) -> Self {
        EncryptionKey::Public(pk)
    }
}

impl<'k> From<&'k SecretKey> for EncryptionKey<'k> {
    fn from(sk: &'k SecretKey) -> Self {
        EncryptionKey::Secret(sk)
    }
}

/// Independent random streams for every distribution the encryptor draws.
#[derive(Debug)]
pub(crate) struct EncryptorSamplers {
    pub(crate) gaussian: GaussianSampler,
    pub(crate) ternary: TernarySampler,
    pub(crate) uniform_q: UniformSampler,
    pub(crate) uniform_p: Option<UniformSampler>,
}

impl EncryptorSamplers {
    fn new(params: &Parameters) -> Self {
        let mut master = fresh_rng();
        let mut child = || ChaCha20Rng::from_seed(master.gen());

        Self {
            gaussian: GaussianSampler::from_rng(params.sigma(), child()),
            ternary: TernarySampler::from_rng(params.h(), child()),
            uniform_q: UniformSampler::from_rng(child()),
            uniform_p: params.ring_p().map(|_| UniformSampler::from_rng(child())),
        }
    }
}

/// Scratch polynomials at the parameters' maximum levels.
#[derive(Debug)]
pub(crate) struct EncryptorBuffers {
    pub(crate) pool_q: [Poly; 2],
    pub(crate) pool_p: [Option<Poly>; 3],
}

impl EncryptorBuffers {
    fn new(params: &Parameters) -> Self {
        let ring_q = params.ring_q();
        let new_p = || params.ring_p().map(|r| r.new_poly());
        Self {
            pool_q: [ring_q.new_poly(), ring_q.new_poly()],
            pool_p: [new_p(), new_p(), new_p()],
        }
    }
}

/// Key-independent encryptor state.
#[derive(Debug)]
pub(crate) struct EncryptorCore {
    pub(crate) params: Parameters,
    pub(crate) samplers: EncryptorSamplers,
    pub(crate) buffers: EncryptorBuffers,
    pub(crate) basis_extender: Option<BasisExtender>,
}

impl EncryptorCore {
    pub(crate) fn new(params: &Parameters) -> Self {
        Self {
            params: params.clone(),
            samplers: EncryptorSamplers::new(params),
            buffers: EncryptorBuffers::new(params),
            basis_extender: params
                .ring_p()
                .map(|_| BasisExtender::new(params.ring_qp())),
        }
    }

    /// Fresh samplers and buffers; parameters and extension tables shared.
    pub(crate) fn shallow_copy(&self) -> Self {
        Self {
            params: self.params.clone(),
            samplers: EncryptorSamplers::new(&self.params),
            buffers: EncryptorBuffers::new(&self.params),
            basis_extender: self.basis_extender.as_ref().map(BasisExtender::shallow_copy),
        }
    }

    /// Writes a symmetric encryption of zero into `(a, b)`, so that
    /// `a + b·sk` is small.
    ///
    /// With `ntt`, the noise is sampled into `a` (extended into P when both
    /// `a` and `b` carry a P part), moved to the NTT domain, and both outputs
    /// are tagged `Ntt`. With `sample`, `b` is drawn uniformly; otherwise the
    /// caller's `b` is used as is, read as NTT-domain values. Without `ntt`,
    /// `a` starts from zero and both outputs are brought back to the
    /// coefficient domain before a second noise term is added to `a`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn encrypt_zero_symmetric_qp(
        &mut self,
        level_q: usize,
        level_p: Option<usize>,
        sk: &PolyQP,
        sample: bool,
        ntt: bool,
        a: &mut PolyQP,
        b: &mut PolyQP,
    ) {
        let ring_qp = self.params.ring_qp();
        let ring_q = ring_qp.ring_q();
        let extend_p = match (a.p.is_some() && b.p.is_some(), level_p) {
            (true, Some(lp)) => Some(lp),
            _ => None,
        };

        if ntt {
            self.samplers.gaussian.read_lvl(ring_q, level_q, &mut a.q);
            if let (Some(lp), Some(ap)) = (extend_p, a.p.as_mut()) {
                ring_qp.extend_basis_small_norm_and_center(&a.q, lp, ap);
            }
            ring_qp.ntt_lvl(level_q, level_p, a);
        } else {
            a.q.zero_lvl(level_q);
            if let (Some(lp), Some(ap)) = (extend_p, a.p.as_mut()) {
                ap.zero_lvl(lp);
            }
        }

        if sample {
            self.samplers.uniform_q.read_lvl(ring_q, level_q, &mut b.q);
            if let (Some(lp), Some(bp), Some(ring_p), Some(uniform_p)) = (
                extend_p,
                b.p.as_mut(),
                ring_qp.ring_p(),
                self.samplers.uniform_p.as_mut(),
            ) {
                uniform_p.read_lvl(ring_p, lp, bp);
            }
        }

        ring_qp.mul_coeffs_montgomery_and_sub_lvl(level_q, level_p, b, sk, a);

        if ntt {
            a.set_domain(Domain::Ntt);
            b.set_domain(Domain::Ntt);
            return;
        }

        ring_qp.inv_ntt_lvl(level_q, level_p, a);
        ring_qp.inv_ntt_lvl(level_q, level_p, b);

        let mut e = PolyQP::new(
            mem::take(&mut self.buffers.pool_q[0]),
            self.buffers.pool_p[0].take(),
        );
        self.samplers.gaussian.read_lvl(ring_q, level_q, &mut e.q);
        if let (Some(lp), Some(ep)) = (extend_p, e.p.as_mut()) {
            ring_qp.extend_basis_small_norm_and_center(&e.q, lp, ep);
        }
        ring_qp.add_lvl(level_q, extend_p, a, &e);

        self.buffers.pool_q[0] = e.q;
        self.buffers.pool_p[0] = e.p;
    }

    /// Public-key encryption; dispatches on the presence of P.
    fn encrypt_pk(
        &mut self,
        pk: &PublicKey,
        pt: &Plaintext,
        ct: &mut Ciphertext,
        level: usize,
        target: Domain,
    ) {
        if self.basis_extender.is_some() {
            self.encrypt_pk_qp(pk, pt, ct, level, target);
        } else {
            self.encrypt_pk_q(pk, pt, ct, level, target);
        }
    }

    /// Masks with u·pk over Q∪P (P at level 0), floods noise there, then
    /// divides P back out.
    fn encrypt_pk_qp(
        &mut self,
        pk: &PublicKey,
        pt: &Plaintext,
        ct: &mut Ciphertext,
        level: usize,
        target: Domain,
    ) {
        let ring_qp = self.params.ring_qp();
        let ring_q = ring_qp.ring_q();
        let level_p = Some(0);

        let mut u = PolyQP::new(
            mem::take(&mut self.buffers.pool_q[0]),
            self.buffers.pool_p[2].take(),
        );
        self.samplers.ternary.read_lvl(ring_q, level, &mut u.q);
        if let Some(up) = u.p.as_mut() {
            ring_qp.extend_basis_small_norm_and_center(&u.q, 0, up);
        }
        ring_qp.ntt_lvl(level, level_p, &mut u);
        ring_qp.mform_lvl(level, level_p, &mut u);

        let mut ct0 = PolyQP::new(mem::take(&mut ct.value[0]), self.buffers.pool_p[0].take());
        let mut ct1 = PolyQP::new(mem::take(&mut ct.value[1]), self.buffers.pool_p[1].take());

        ring_qp.mul_coeffs_montgomery_lvl(level, level_p, &u, &pk.value[0], &mut ct0);
        ring_qp.mul_coeffs_montgomery_lvl(level, level_p, &u, &pk.value[1], &mut ct1);
        ring_qp.inv_ntt_lvl(level, level_p, &mut ct0);
        ring_qp.inv_ntt_lvl(level, level_p, &mut ct1);

        // u is no longer needed; its buffers hold the two error terms.
        let mut e = u;
        for c in [&mut ct0, &mut ct1] {
            self.samplers.gaussian.read_lvl(ring_q, level, &mut e.q);
            if let Some(ep) = e.p.as_mut() {
                ring_qp.extend_basis_small_norm_and_center(&e.q, 0, ep);
            }
            ring_qp.add_lvl(level, level_p, c, &e);
        }

        if let Some(extender) = self.basis_extender.as_mut() {
            for c in [&mut ct0, &mut ct1] {
                if let Some(cp) = c.p.as_ref() {
                    extender.mod_down_qp_to_q(level, 0, &mut c.q, cp);
                }
            }
        }

        ct.value[0] = ct0.q;
        ct.value[1] = ct1.q;
        self.buffers.pool_p[0] = ct0.p;
        self.buffers.pool_p[1] = ct1.p;
        self.buffers.pool_q[0] = e.q;
        self.buffers.pool_p[2] = e.p;

        let [c0, c1] = &mut ct.value;
        let scratch = &mut self.buffers.pool_q[0];
        match target {
            Domain::Ntt => {
                if !pt.is_ntt() {
                    ring_q.add_lvl(level, c0, &pt.value);
                }
                ring_q.ntt_lvl(level, c0);
                ring_q.ntt_lvl(level, c1);
                if pt.is_ntt() {
                    ring_q.add_lvl(level, c0, &pt.value);
                }
            }
            Domain::Coeff => {
                if pt.is_ntt() {
                    ring_q.copy_lvl(level, &pt.value, scratch);
                    ring_q.inv_ntt_lvl(level, scratch);
                    ring_q.add_lvl(level, c0, scratch);
                } else {
                    ring_q.add_lvl(level, c0, &pt.value);
                }
            }
        }
    }

    /// Masks with u·pk over Q only.
    fn encrypt_pk_q(
        &mut self,
        pk: &PublicKey,
        pt: &Plaintext,
        ct: &mut Ciphertext,
        level: usize,
        target: Domain,
    ) {
        let ring_q = self.params.ring_q();
        let [c0, c1] = &mut ct.value;
        let pool = &mut self.buffers.pool_q[0];
        let gaussian = &mut self.samplers.gaussian;

        self.samplers.ternary.read_lvl(ring_q, level, pool);
        ring_q.ntt_lvl(level, pool);
        ring_q.mform_lvl(level, pool);

        ring_q.mul_coeffs_montgomery_lvl(level, pool, &pk.value[0].q, c0);
        ring_q.mul_coeffs_montgomery_lvl(level, pool, &pk.value[1].q, c1);

        match target {
            Domain::Ntt => {
                gaussian.read_lvl(ring_q, level, pool);
                ring_q.ntt_lvl(level, pool);
                ring_q.add_lvl(level, c1, pool);

                gaussian.read_lvl(ring_q, level, pool);
                if pt.is_ntt() {
                    ring_q.ntt_lvl(level, pool);
                    ring_q.add_lvl(level, c0, pool);
                    ring_q.add_lvl(level, c0, &pt.value);
                } else {
                    ring_q.add_lvl(level, pool, &pt.value);
                    ring_q.ntt_lvl(level, pool);
                    ring_q.add_lvl(level, c0, pool);
                }
            }
            Domain::Coeff => {
                ring_q.inv_ntt_lvl(level, c0);
                ring_q.inv_ntt_lvl(level, c1);
                gaussian.read_and_add_lvl(ring_q, level, c0);
                gaussian.read_and_add_lvl(ring_q, level, c1);

                if pt.is_ntt() {
                    ring_q.copy_lvl(level, &pt.value, pool);
                    ring_q.inv_ntt_lvl(level, pool);
                    ring_q.add_lvl(level, c0, pool);
                } else {
                    ring_q.add_lvl(level, c0, &pt.value);
                }
            }
        }
    }

    /// Secret-key encryption with `c1` already in place, read as NTT values.
    fn encrypt_sk(
        &mut self,
        sk: &SecretKey,
        pt: &Plaintext,
        ct: &mut Ciphertext,
        level: usize,
        target: Domain,
    ) {
        let ring_q = self.params.ring_q();
        let [c0, c1] = &mut ct.value;
        let pool = &mut self.buffers.pool_q[0];
        let gaussian = &mut self.samplers.gaussian;

        ring_q.mul_coeffs_montgomery_lvl(level, c1, &sk.value.q, c0);
        ring_q.neg_lvl(level, c0);

        match target {
            Domain::Ntt => {
                gaussian.read_lvl(ring_q, level, pool);
                if pt.is_ntt() {
                    ring_q.ntt_lvl(level, pool);
                    ring_q.add_lvl(level, c0, pool);
                    ring_q.add_lvl(level, c0, &pt.value);
                } else {
                    ring_q.add_lvl(level, pool, &pt.value);
                    ring_q.ntt_lvl(level, pool);
                    ring_q.add_lvl(level, c0, pool);
                }
            }
            Domain::Coeff => {
                ring_q.inv_ntt_lvl(level, c0);
                ring_q.inv_ntt_lvl(level, c1);
                gaussian.read_and_add_lvl(ring_q, level, c0);

                if pt.is_ntt() {
                    ring_q.copy_lvl(level, &pt.value, pool);
                    ring_q.inv_ntt_lvl(level, pool);
                    ring_q.add_lvl(level, c0, pool);
                } else {
                    ring_q.add_lvl(level, c0, &pt.value);
                }
            }
        }
    }
}

/// RLWE encryptor bound to one key.
///
/// # Example
///
/// ```
/// use bfv_rlwe::math::Domain;
/// use bfv_rlwe::params::{Parameters, ParametersLiteral};
/// use bfv_rlwe::rlwe::{Ciphertext, Encryptor, KeyGenerator, Plaintext};
///
/// let params = Parameters::new(ParametersLiteral::new(
///     10,
///     65537,
///     vec![36028797014376449],
///     vec![576460752586407937],
/// ))
/// .unwrap();
/// let mut kgen = KeyGenerator::new(&params);
/// let (sk, pk) = kgen.gen_key_pair();
///
/// let pt = Plaintext::new(&params, 0);
/// let mut ct = Ciphertext::new(&params, 0, Domain::Ntt);
/// Encryptor::new(&params, &pk).encrypt(&pt, &mut ct);
/// Encryptor::new(&params, &sk).encrypt(&pt, &mut ct);
/// assert!(ct.is_ntt());
/// ```
#[derive(Debug)]
pub struct Encryptor<'k> {
    pub(crate) core: EncryptorCore,
    key: EncryptionKey<'k>,
}

impl<'k> Encryptor<'k> {
    /// Builds an encryptor for `params` bound to `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key's ring degree differs from the parameters', or if
    /// the system randomness source fails.
    pub fn new(params: &Parameters, key: impl Into<EncryptionKey<'k>>) -> Self {
        Self::bind(EncryptorCore::new(params), key.into())
    }

    fn bind(core: EncryptorCore, key: EncryptionKey<'k>) -> Self {
        let n = core.params.n();
        match key {
            EncryptionKey::Public(pk) => assert!(
                pk.value.iter().all(|v| v.n() == n),
                "cannot bind encryptor: public key degree does not match ring degree {}",
                n
            ),
            EncryptionKey::Secret(sk) => assert!(
                sk.ring_dim() == n,
                "cannot bind encryptor: secret key degree does not match ring degree {}",
                n
            ),
        }
        debug!(
            n,
            public = matches!(key, EncryptionKey::Public(_)),
            "bound encryptor"
        );
        Self { core, key }
    }

    pub fn params(&self) -> &Parameters {
        &self.core.params
    }

    pub fn key(&self) -> EncryptionKey<'k> {
        self.key
    }

    /// Independent encryptor with the same parameters and key.
    ///
    /// Samplers and buffers are freshly allocated, so the copy and the
    /// original may run on different threads.
    pub fn shallow_copy(&self) -> Encryptor<'k> {
        Encryptor {
            core: self.core.shallow_copy(),
            key: self.key,
        }
    }

    /// Independent encryptor with the same parameters bound to another key.
    ///
    /// # Panics
    ///
    /// Panics on a ring degree mismatch, as [`Encryptor::new`].
    pub fn with_key<'b>(&self, key: impl Into<EncryptionKey<'b>>) -> Encryptor<'b> {
        Encryptor::bind(self.core.shallow_copy(), key.into())
    }

    /// Encrypts `pt` into `ct`.
    ///
    /// The output domain is the domain `ct.value[1]` carries on entry, the
    /// working level is `min(pt.level(), ct.level())` and `ct` is truncated
    /// to it.
    pub fn encrypt(&mut self, pt: &Plaintext, ct: &mut Ciphertext) {
        let level = pt.level().min(ct.level());
        let target = ct.value[1].domain();
        trace!(level, ?target, "encrypt");

        match self.key {
            // u·pk overwrites both components, so c1 needs no uniform fill.
            EncryptionKey::Public(pk) => self.core.encrypt_pk(pk, pt, ct, level, target),
            EncryptionKey::Secret(sk) => {
                let core = &mut self.core;
                core.samplers
                    .uniform_q
                    .read_lvl(core.params.ring_q(), level, &mut ct.value[1]);
                core.encrypt_sk(sk, pt, ct, level, target);
            }
        }
        finalize(ct, level, target);
    }

    /// Encrypts `pt` into a new ciphertext at the plaintext's level and
    /// domain.
    pub fn encrypt_new(&mut self, pt: &Plaintext) -> Ciphertext {
        let mut ct = Ciphertext::new(&self.core.params, pt.level(), pt.domain());
        self.encrypt(pt, &mut ct);
        ct
    }

    /// Secret-key encryption with `c1` taken from a common reference
    /// polynomial instead of being sampled.
    ///
    /// `crp` is read as NTT-domain values; its residues are copied into
    /// `ct.value[1]` on the rows both share.
    ///
    /// # Panics
    ///
    /// Panics if the encryptor is bound to a public key.
    pub fn encrypt_from_crp(&mut self, pt: &Plaintext, crp: &Poly, ct: &mut Ciphertext) {
        let sk = match self.key {
            EncryptionKey::Secret(sk) => sk,
            EncryptionKey::Public(_) => {
                panic!("cannot encrypt from a common reference polynomial with a public key")
            }
        };
        let level = pt.level().min(ct.level());
        let target = ct.value[1].domain();
        trace!(level, ?target, "encrypt from crp");

        ct.value[1].copy_values_from(crp);
        self.core.encrypt_sk(sk, pt, ct, level, target);
        finalize(ct, level, target);
    }
}

/// Synchronizes the component tags and drops rows above `level`.
fn finalize(ct: &mut Ciphertext, level: usize, target: Domain) {
    for c in &mut ct.value {
        c.set_domain(target);
        c.truncate(level);
    }
}
