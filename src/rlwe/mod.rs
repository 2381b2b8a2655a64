//! RLWE (Ring Learning With Errors) encryption module
//!
//! Works over R_Q = Z_Q[X]/(X^N + 1) with Q a chain of NTT-friendly primes,
//! optionally paired with an auxiliary chain P used to flood noise during
//! public-key encryption.
//!
//! # Overview
//!
//! - Secret key s: ternary with fixed Hamming weight
//! - Public key (pk0, pk1) = (-a·s + e, a)
//! - Ciphertext (c0, c1) with c0 + c1·s = m + e
//!
//! Plaintexts are added as given; scaling by Δ = ⌊Q/T⌋ is the caller's
//! encoding concern.
//!
//! # Example
//!
//! ```
//! use bfv_rlwe::math::Domain;
//! use bfv_rlwe::params::{Parameters, ParametersLiteral};
//! use bfv_rlwe::rlwe::{Ciphertext, Decryptor, Encryptor, KeyGenerator, Plaintext};
//!
//! let params = Parameters::new(ParametersLiteral::new(
//!     10,
//!     65537,
//!     vec![36028797014376449, 36028797013327873],
//!     vec![],
//! ))
//! .unwrap();
//! let (sk, pk) = KeyGenerator::new(&params).gen_key_pair();
//!
//! let pt = Plaintext::new(&params, 1);
//! let ct = Encryptor::new(&params, &pk).encrypt_new(&pt);
//! let noisy = Decryptor::new(&params, &sk).decrypt_new(&ct);
//! assert!(params.ring_q().linf_norm_lvl(1, &noisy.value) < 1 << 20);
//! ```

mod dec;
mod enc;
mod keygen;
mod types;

pub use dec::Decryptor;
pub use enc::{EncryptionKey, Encryptor};
pub use keygen::KeyGenerator;
pub use types::{Ciphertext, Plaintext, PublicKey, SecretKey};
