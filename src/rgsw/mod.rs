//! RGSW (Ring-GSW) gadget encryption
//!
//! An RGSW ciphertext of m is a grid of RLWE samples whose rows encrypt the
//! gadget multiples P·B^j·m and P·B^j·m·s at each RNS digit. It is the
//! operand external products consume; the product itself belongs to the
//! evaluator and is not part of this crate.
//!
//! Only secret-key encryption is supported.

mod enc;
mod types;

pub use types::RgswCiphertext;
