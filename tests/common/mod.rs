//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use bfv_rlwe::math::{Domain, Poly, UniformSampler};
use bfv_rlwe::params::{Parameters, ParametersLiteral};
use bfv_rlwe::rlwe::Plaintext;

pub const Q: [u64; 3] = [36028797014376449, 36028797013327873, 36028797010444289];
pub const P: [u64; 2] = [576460752586407937, 576460752585490433];

/// N = 1024, three Q primes, two P primes, small Hamming weight.
pub fn test_params() -> Parameters {
    let mut lit = ParametersLiteral::new(10, 65537, Q.to_vec(), P.to_vec());
    lit.h = 64;
    Parameters::new(lit).unwrap()
}

/// Same as [`test_params`] without the auxiliary chain.
pub fn test_params_no_p() -> Parameters {
    let mut lit = ParametersLiteral::new(10, 65537, Q.to_vec(), vec![]);
    lit.h = 64;
    Parameters::new(lit).unwrap()
}

/// Uniform plaintext at `level`, returned in `domain` together with its
/// coefficient-domain value.
pub fn random_plaintext(params: &Parameters, level: usize, domain: Domain) -> (Plaintext, Poly) {
    let ring_q = params.ring_q();
    let mut coeffs = ring_q.new_poly_lvl(level);
    UniformSampler::new().read_lvl(ring_q, level, &mut coeffs);

    let mut pt = Plaintext::from_poly(coeffs.clone());
    if domain == Domain::Ntt {
        ring_q.ntt_lvl(level, &mut pt.value);
    }
    (pt, coeffs)
}

/// Largest centered |got - expected| over rows `0..=level`.
pub fn noise(params: &Parameters, level: usize, got: &Poly, expected: &Poly) -> u64 {
    let ring_q = params.ring_q();
    let mut diff = got.clone();
    ring_q.sub_lvl(level, &mut diff, expected);
    ring_q.linf_norm_lvl(level, &diff)
}

pub fn assert_noise_below(
    params: &Parameters,
    level: usize,
    got: &Poly,
    expected: &Poly,
    bound: u64,
) {
    let n = noise(params, level, got, expected);
    assert!(n < bound, "noise {} exceeds bound {}", n, bound);
}
