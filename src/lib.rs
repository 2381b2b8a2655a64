//! bfv-rlwe: the encryption side of a BFV-family RLWE scheme
//!
//! Polynomials live in R_Q = Z_Q[X]/(X^N + 1) in RNS form, with Q a chain of
//! NTT-friendly primes and an optional auxiliary chain P.
//!
//! Key components:
//! - Public-key and secret-key RLWE encryption, in either domain
//! - Encryption from a common reference polynomial
//! - RGSW gadget encryption
//! - Multiparty partial decryption and merge
//! - A compact binary codec for parameter sets

pub mod error;
pub mod math;
pub mod multiparty;
pub mod params;
pub mod rgsw;
pub mod rlwe;

pub use error::{ParamsError, Result};
pub use multiparty::MultipartyDecryptor;
pub use params::{default_params, Parameters, ParametersLiteral};
pub use rgsw::RgswCiphertext;
pub use rlwe::{
    Ciphertext, Decryptor, EncryptionKey, Encryptor, KeyGenerator, Plaintext, PublicKey,
    SecretKey,
};
