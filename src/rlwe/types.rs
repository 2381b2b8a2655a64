//! RLWE plaintext, ciphertext and key types.
//!
//! Ring-LWE over R_Q = Z_Q[X]/(X^N + 1) in RNS form.

use serde::{Deserialize, Serialize};

use crate::math::{Domain, Poly, PolyQP};
use crate::params::Parameters;

/// Plaintext polynomial over Q.
///
/// Encoding application data is left to the caller; the encryptor only
/// reads the residues and the domain tag.
///
/// # Fields
///
/// * `value` - The plaintext polynomial
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plaintext {
    pub value: Poly,
}

impl Plaintext {
    /// Zero plaintext at `level` in the coefficient domain.
    pub fn new(params: &Parameters, level: usize) -> Self {
        Self {
            value: params.ring_q().new_poly_lvl(level),
        }
    }

    pub fn from_poly(value: Poly) -> Self {
        Self { value }
    }

    pub fn level(&self) -> usize {
        self.value.level()
    }

    pub fn domain(&self) -> Domain {
        self.value.domain()
    }

    pub fn is_ntt(&self) -> bool {
        self.value.is_ntt()
    }
}

/// RLWE ciphertext: (c0, c1) ∈ R_Q × R_Q with c0 + c1·s = m + e.
///
/// Both components share one level and one domain tag after encryption.
///
/// # Fields
///
/// * `value` - `[c0, c1]`
///
/// # Example
///
/// ```
/// use bfv_rlwe::math::Domain;
/// use bfv_rlwe::params::{default_params, Parameters};
/// use bfv_rlwe::rlwe::Ciphertext;
///
/// let params = Parameters::new(default_params()[0].clone()).unwrap();
/// let ct = Ciphertext::new(&params, 1, Domain::Ntt);
/// assert_eq!(ct.level(), 1);
/// assert!(ct.is_ntt());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    pub value: [Poly; 2],
}

impl Ciphertext {
    /// Zero ciphertext at `level` with both components tagged `domain`.
    pub fn new(params: &Parameters, level: usize, domain: Domain) -> Self {
        let ring_q = params.ring_q();
        let mut value = [ring_q.new_poly_lvl(level), ring_q.new_poly_lvl(level)];
        for v in &mut value {
            v.set_domain(domain);
        }
        Self { value }
    }

    pub fn from_parts(c0: Poly, c1: Poly) -> Self {
        Self { value: [c0, c1] }
    }

    /// Level of `c0`.
    pub fn level(&self) -> usize {
        self.value[0].level()
    }

    pub fn domain(&self) -> Domain {
        self.value[0].domain()
    }

    pub fn is_ntt(&self) -> bool {
        self.value[0].is_ntt()
    }
}

/// RLWE secret key.
///
/// A ternary polynomial s, extended to P when the parameters have an
/// auxiliary chain, stored in the NTT domain and in Montgomery form.
///
/// # Fields
///
/// * `value` - s over Q (and P)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKey {
    pub value: PolyQP,
}

impl SecretKey {
    pub fn from_poly(value: PolyQP) -> Self {
        Self { value }
    }

    /// Ring dimension of the key.
    pub fn ring_dim(&self) -> usize {
        self.value.n()
    }
}

/// RLWE public key: (pk0, pk1) with pk0 = -pk1·s + e over Q (and P).
///
/// Stored in the NTT domain, standard form.
///
/// # Fields
///
/// * `value` - `[pk0, pk1]`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub value: [PolyQP; 2],
}

impl PublicKey {
    pub fn from_parts(pk0: PolyQP, pk1: PolyQP) -> Self {
        Self { value: [pk0, pk1] }
    }

    /// Ring dimension of the key, 0 if its halves disagree.
    pub fn ring_dim(&self) -> usize {
        let n = self.value[0].n();
        if self.value[1].n() == n {
            n
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParametersLiteral;

    fn params() -> Parameters {
        Parameters::new(ParametersLiteral::new(
            6,
            65537,
            vec![36028797014376449, 36028797013327873],
            vec![],
        ))
        .unwrap()
    }

    #[test]
    fn test_ciphertext_shape() {
        let params = params();
        let ct = Ciphertext::new(&params, 0, Domain::Coeff);
        assert_eq!(ct.level(), 0);
        assert_eq!(ct.value[1].level(), 0);
        assert_eq!(ct.value[0].n(), 64);
        assert!(!ct.is_ntt());
    }

    #[test]
    fn test_plaintext_defaults_to_coeff() {
        let params = params();
        let pt = Plaintext::new(&params, 1);
        assert_eq!(pt.level(), 1);
        assert_eq!(pt.domain(), Domain::Coeff);
    }

    #[test]
    fn test_ciphertext_bincode_roundtrip() {
        let params = params();
        let mut ct = Ciphertext::new(&params, 1, Domain::Ntt);
        ct.value[1].row_mut(1)[7] = 99;
        let bytes = bincode::serialize(&ct).unwrap();
        let back: Ciphertext = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, ct);
    }

    #[test]
    fn test_public_key_ring_dim_mismatch() {
        let pk = PublicKey::from_parts(
            PolyQP::new(Poly::zero(8, 0), None),
            PolyQP::new(Poly::zero(16, 0), None),
        );
        assert_eq!(pk.ring_dim(), 0);
    }
}
