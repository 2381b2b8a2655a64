//! RLWE encryption correctness tests
//!
//! Every ciphertext is checked by decrypting with the secret key and
//! measuring the centered distance to the plaintext.

mod common;

use std::thread;

use rayon::prelude::*;

use bfv_rlwe::math::{Domain, Poly, UniformSampler};
use bfv_rlwe::params::{Parameters, ParametersLiteral, LOGN11_Q56};
use bfv_rlwe::rlwe::{Ciphertext, Decryptor, Encryptor, KeyGenerator, Plaintext};

use common::{assert_noise_below, noise, random_plaintext, test_params, test_params_no_p};

const DOMAINS: [Domain; 2] = [Domain::Coeff, Domain::Ntt];

#[test]
fn test_sk_roundtrip_all_domains() {
    for params in [test_params(), test_params_no_p()] {
        let sk = KeyGenerator::new(&params).gen_secret_key();
        let mut enc = Encryptor::new(&params, &sk);
        let mut dec = Decryptor::new(&params, &sk);
        let level = params.max_level_q();

        for ct_domain in DOMAINS {
            for pt_domain in DOMAINS {
                let (pt, expected) = random_plaintext(&params, level, pt_domain);
                let mut ct = Ciphertext::new(&params, level, ct_domain);
                enc.encrypt(&pt, &mut ct);

                assert_eq!(ct.value[0].domain(), ct_domain);
                assert_eq!(ct.value[1].domain(), ct_domain);
                let got = dec.decrypt_new(&ct);
                assert_noise_below(&params, level, &got.value, &expected, 64);
            }
        }
    }
}

#[test]
fn test_pk_matches_sk_with_and_without_p() {
    for params in [test_params(), test_params_no_p()] {
        let (sk, pk) = KeyGenerator::new(&params).gen_key_pair();
        let mut enc_pk = Encryptor::new(&params, &pk);
        let mut enc_sk = enc_pk.with_key(&sk);
        let mut dec = Decryptor::new(&params, &sk);
        let level = params.max_level_q();

        for ct_domain in DOMAINS {
            for pt_domain in DOMAINS {
                let (pt, expected) = random_plaintext(&params, level, pt_domain);

                let mut ct_pk = Ciphertext::new(&params, level, ct_domain);
                enc_pk.encrypt(&pt, &mut ct_pk);
                let mut ct_sk = Ciphertext::new(&params, level, ct_domain);
                enc_sk.encrypt(&pt, &mut ct_sk);

                assert_eq!(ct_pk.domain(), ct_domain);
                let got_pk = dec.decrypt_new(&ct_pk);
                assert_noise_below(&params, level, &got_pk.value, &expected, 1 << 14);
                assert_noise_below(&params, level, &dec.decrypt_new(&ct_sk).value, &expected, 64);
            }
        }
    }
}

#[test]
fn test_pk_ignores_stale_ciphertext_contents() {
    for params in [test_params(), test_params_no_p()] {
        let (sk, pk) = KeyGenerator::new(&params).gen_key_pair();
        let mut enc = Encryptor::new(&params, &pk);
        let mut dec = Decryptor::new(&params, &sk);
        let mut uniform = UniformSampler::new();
        let level = params.max_level_q();

        for ct_domain in DOMAINS {
            let (pt, expected) = random_plaintext(&params, level, Domain::Coeff);
            let mut ct = Ciphertext::new(&params, level, ct_domain);
            for c in ct.value.iter_mut() {
                uniform.read_lvl(params.ring_q(), level, c);
                c.set_domain(ct_domain);
            }
            enc.encrypt(&pt, &mut ct);

            assert_eq!(ct.domain(), ct_domain);
            let got = dec.decrypt_new(&ct);
            assert_noise_below(&params, level, &got.value, &expected, 1 << 14);
        }
    }
}

#[test]
fn test_pk_with_p_floods_less_noise() {
    let with_p = test_params();
    let without_p = test_params_no_p();
    let level = with_p.max_level_q();

    let max_noise = |params: &Parameters| {
        let (sk, pk) = KeyGenerator::new(params).gen_key_pair();
        let mut enc = Encryptor::new(params, &pk);
        let mut dec = Decryptor::new(params, &sk);
        let (pt, expected) = random_plaintext(params, level, Domain::Coeff);
        (0..4)
            .map(|_| noise(params, level, &dec.decrypt_new(&enc.encrypt_new(&pt)).value, &expected))
            .max()
            .unwrap()
    };

    // Dividing by P leaves only the rounding error of the mod-down.
    let flooded = max_noise(&with_p);
    assert!(flooded < 64);
    assert!(flooded < max_noise(&without_p));
}

#[test]
fn test_encrypt_from_crp_reuses_c1() {
    let params = test_params();
    let sk = KeyGenerator::new(&params).gen_secret_key();
    let mut enc = Encryptor::new(&params, &sk);
    let mut dec = Decryptor::new(&params, &sk);
    let ring_q = params.ring_q();

    let mut crp = ring_q.new_poly();
    UniformSampler::new().read_lvl(ring_q, params.max_level_q(), &mut crp);
    crp.set_domain(Domain::Ntt);

    let level = 1;
    let (pt, expected) = random_plaintext(&params, level, Domain::Coeff);
    let mut ct = Ciphertext::new(&params, level, Domain::Ntt);
    enc.encrypt_from_crp(&pt, &crp, &mut ct);

    for i in 0..=level {
        assert_eq!(ct.value[1].row(i), crp.row(i));
    }
    assert_noise_below(&params, level, &dec.decrypt_new(&ct).value, &expected, 64);

    // Two parties encrypting from the same CRP share c1 exactly.
    let mut other = Ciphertext::new(&params, level, Domain::Ntt);
    enc.shallow_copy().encrypt_from_crp(&pt, &crp, &mut other);
    assert_eq!(other.value[1], ct.value[1]);
    assert_ne!(other.value[0], ct.value[0]);
}

#[test]
fn test_encrypt_from_crp_coeff_target() {
    let params = test_params_no_p();
    let sk = KeyGenerator::new(&params).gen_secret_key();
    let mut enc = Encryptor::new(&params, &sk);
    let mut dec = Decryptor::new(&params, &sk);
    let ring_q = params.ring_q();
    let level = params.max_level_q();

    let mut crp = ring_q.new_poly();
    UniformSampler::new().read_lvl(ring_q, level, &mut crp);
    crp.set_domain(Domain::Ntt);

    let (pt, expected) = random_plaintext(&params, level, Domain::Ntt);
    let mut ct = Ciphertext::new(&params, level, Domain::Coeff);
    enc.encrypt_from_crp(&pt, &crp, &mut ct);

    let mut c1 = crp.clone();
    ring_q.inv_ntt_lvl(level, &mut c1);
    assert_eq!(ct.value[1], c1);
    assert_noise_below(&params, level, &dec.decrypt_new(&ct).value, &expected, 64);
}

#[test]
#[should_panic(expected = "common reference polynomial")]
fn test_encrypt_from_crp_rejects_public_key() {
    let params = test_params_no_p();
    let (_, pk) = KeyGenerator::new(&params).gen_key_pair();
    let mut enc = Encryptor::new(&params, &pk);
    let pt = Plaintext::new(&params, 0);
    let mut ct = Ciphertext::new(&params, 0, Domain::Ntt);
    let crp = params.ring_q().new_poly();
    enc.encrypt_from_crp(&pt, &crp, &mut ct);
}

#[test]
fn test_level_is_minimum_of_inputs() {
    let params = test_params();
    let (sk, pk) = KeyGenerator::new(&params).gen_key_pair();
    let mut dec = Decryptor::new(&params, &sk);

    for key_is_public in [false, true] {
        let mut enc = if key_is_public {
            Encryptor::new(&params, &pk)
        } else {
            Encryptor::new(&params, &sk)
        };

        // Plaintext above the ciphertext.
        let (pt, expected) = random_plaintext(&params, 2, Domain::Coeff);
        let mut ct = Ciphertext::new(&params, 1, Domain::Ntt);
        enc.encrypt(&pt, &mut ct);
        assert_eq!(ct.value[0].rows().len(), 2);
        assert_eq!(ct.value[1].rows().len(), 2);
        assert_noise_below(&params, 1, &dec.decrypt_new(&ct).value, &expected, 1 << 14);

        // Ciphertext above the plaintext is truncated.
        let (pt, expected) = random_plaintext(&params, 0, Domain::Ntt);
        let mut ct = Ciphertext::new(&params, 2, Domain::Coeff);
        enc.encrypt(&pt, &mut ct);
        assert_eq!(ct.value[0].rows().len(), 1);
        assert_eq!(ct.value[1].rows().len(), 1);
        assert_noise_below(&params, 0, &dec.decrypt_new(&ct).value, &expected, 1 << 14);
    }
}

#[test]
fn test_domain_does_not_change_decryption() {
    let params = test_params();
    let (sk, pk) = KeyGenerator::new(&params).gen_key_pair();
    let mut dec = Decryptor::new(&params, &sk);
    let level = params.max_level_q();
    let (pt_coeff, expected) = random_plaintext(&params, level, Domain::Coeff);
    let mut pt_ntt = pt_coeff.clone();
    params.ring_q().ntt_lvl(level, &mut pt_ntt.value);

    let mut enc = Encryptor::new(&params, &pk);
    let decrypted: Vec<Poly> = [
        (&pt_coeff, Domain::Coeff),
        (&pt_coeff, Domain::Ntt),
        (&pt_ntt, Domain::Coeff),
        (&pt_ntt, Domain::Ntt),
    ]
    .into_iter()
    .map(|(pt, domain)| {
        let mut ct = Ciphertext::new(&params, level, domain);
        enc.encrypt(pt, &mut ct);
        dec.decrypt_new(&ct).value
    })
    .collect();

    for got in &decrypted {
        assert_eq!(got.domain(), Domain::Coeff);
        assert_noise_below(&params, level, got, &expected, 1 << 14);
    }
}

/// Decodes round(T·x / Q) mod T for a single-modulus plaintext.
fn decode_single_modulus(pt: &Poly, q: u64, t: u64) -> Vec<u64> {
    pt.row(0)
        .iter()
        .map(|&x| ((((x as u128) * (t as u128) + (q as u128) / 2) / q as u128) % t as u128) as u64)
        .collect()
}

#[test]
fn test_zero_encryptions_differ_and_decrypt_to_zero() {
    let literal = ParametersLiteral::new(12, 65537, LOGN11_Q56.to_vec(), vec![]);
    let params = Parameters::new(literal).unwrap();
    assert_eq!(params.n(), 4096);
    assert_eq!(params.sigma(), 3.19);

    let (sk, pk) = KeyGenerator::new(&params).gen_key_pair();
    let mut dec = Decryptor::new(&params, &sk);
    let q = LOGN11_Q56[0];
    let t = params.t();
    let pt = Plaintext::new(&params, 0);
    let zero = params.ring_q().new_poly_lvl(0);

    for mut enc in [Encryptor::new(&params, &sk), Encryptor::new(&params, &pk)] {
        let first = enc.encrypt_new(&pt);
        let second = enc.encrypt_new(&pt);
        assert_ne!(first, second);

        for ct in [&first, &second] {
            let got = dec.decrypt_new(ct);
            assert_noise_below(&params, 0, &got.value, &zero, q / (2 * t));
            assert!(decode_single_modulus(&got.value, q, t).iter().all(|&m| m == 0));
        }
    }
}

#[test]
fn test_scaled_message_decodes_exactly() {
    let literal = ParametersLiteral::new(12, 65537, LOGN11_Q56.to_vec(), vec![]);
    let params = Parameters::new(literal).unwrap();
    let (sk, pk) = KeyGenerator::new(&params).gen_key_pair();
    let q = LOGN11_Q56[0];
    let t = params.t();
    let delta = q / t;

    let message: Vec<u64> = (0..params.n() as u64).map(|i| (i * 7919) % t).collect();
    let mut pt = Plaintext::new(&params, 0);
    for (c, &m) in pt.value.row_mut(0).iter_mut().zip(&message) {
        *c = m * delta;
    }

    let mut dec = Decryptor::new(&params, &sk);
    for mut enc in [Encryptor::new(&params, &sk), Encryptor::new(&params, &pk)] {
        let ct = enc.encrypt_new(&pt);
        assert_eq!(decode_single_modulus(&dec.decrypt_new(&ct).value, q, t), message);
    }
}

#[test]
fn test_shallow_copies_across_threads() {
    let params = test_params();
    let (sk, pk) = KeyGenerator::new(&params).gen_key_pair();
    let encryptor = Encryptor::new(&params, &pk);
    let level = params.max_level_q();
    let (pt, expected) = random_plaintext(&params, level, Domain::Coeff);

    let ciphertexts: Vec<Ciphertext> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mut enc = encryptor.shallow_copy();
                let pt = &pt;
                s.spawn(move || enc.encrypt_new(pt))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let pooled: Vec<Ciphertext> = (0..8)
        .into_par_iter()
        .map_init(|| encryptor.with_key(&sk), |enc, _| enc.encrypt_new(&pt))
        .collect();

    let mut dec = Decryptor::new(&params, &sk);
    for ct in ciphertexts.iter().chain(&pooled) {
        assert_noise_below(&params, level, &dec.decrypt_new(ct).value, &expected, 1 << 14);
    }
    assert_ne!(ciphertexts[0], ciphertexts[1]);
}

#[test]
#[should_panic(expected = "cannot bind encryptor")]
fn test_degree_mismatch_panics() {
    let small = test_params_no_p();
    let large_literal = ParametersLiteral::new(11, 65537, common::Q.to_vec(), vec![]);
    let large = Parameters::new(large_literal).unwrap();
    let sk = KeyGenerator::new(&small).gen_secret_key();
    let _ = Encryptor::new(&large, &sk);
}
