//! CRT (Chinese Remainder Theorem) helpers for RNS chains.

use num_bigint::BigUint;

/// Compute a modular inverse using extended Euclidean algorithm.
///
/// Returns `x` such that `(a * x) % modulus == 1`.
///
/// # Panics
///
/// Panics if `a` is not invertible modulo `modulus`.
pub fn mod_inverse(a: u64, modulus: u64) -> u64 {
    let mut t: i128 = 0;
    let mut new_t: i128 = 1;
    let mut r: i128 = modulus as i128;
    let mut new_r: i128 = (a % modulus) as i128;

    while new_r != 0 {
        let quotient = r / new_r;
        (t, new_t) = (new_t, t - quotient * new_t);
        (r, new_r) = (new_r, r - quotient * new_r);
    }

    if r != 1 {
        panic!("mod_inverse: value is not invertible");
    }

    if t < 0 {
        t += modulus as i128;
    }
    t as u64
}

/// Exact product of a modulus chain.
pub fn modulus_product(moduli: &[u64]) -> BigUint {
    moduli
        .iter()
        .fold(BigUint::from(1u64), |acc, &m| acc * BigUint::from(m))
}

/// Product of the chain with entry `skip` left out, reduced modulo `target`.
pub fn punctured_product_mod(moduli: &[u64], skip: usize, target: u64) -> u64 {
    moduli
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != skip)
        .fold(1u64, |acc, (_, &m)| {
            ((acc as u128 * (m % target) as u128) % target as u128) as u64
        })
}
