//! Multiparty decryption
//!
//! Two stateless steps: every key holder turns the shared c1 component into
//! a decryption share with its own fragment, then the shares are merged with
//! c0. The combined secret is never materialized.

mod decryptor;

pub use decryptor::MultipartyDecryptor;
