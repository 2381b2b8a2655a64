//! Error handling for parameter construction and decoding
//!
//! Encryption itself has no recoverable errors: precondition violations
//! panic and everything else completes silently. Only building or decoding
//! a parameter set can fail in a way the caller is expected to handle.

use thiserror::Error;

/// Which modulus chain an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    Q,
    P,
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Chain::Q => f.write_str("Q"),
            Chain::P => f.write_str("P"),
        }
    }
}

/// Parameter validation or decoding error
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("invalid parameter encoding: need at least 3 header bytes, got {0}")]
    TooShort(usize),

    #[error("ring degree 2^{log_n} exceeds the maximum 2^{max}")]
    DegreeTooLarge { log_n: usize, max: usize },

    #[error("ring degree must be at least 2")]
    DegreeTooSmall,

    #[error("{chain} chain has {count} moduli, the maximum is {max}")]
    TooManyModuli { chain: Chain, count: usize, max: usize },

    #[error("Q chain must contain at least one modulus")]
    EmptyModulusChain,

    #[error("invalid parameter encoding: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("{chain} modulus {modulus} does not fit in 61 bits")]
    ModulusTooLarge { chain: Chain, modulus: u64 },

    #[error("{chain} modulus {modulus} is not congruent to 1 mod 2N (N = {n})")]
    NotNttFriendly { chain: Chain, modulus: u64, n: usize },

    #[error("{chain} modulus {modulus} is not prime")]
    NotPrime { chain: Chain, modulus: u64 },

    #[error("modulus {0} appears more than once across Q and P")]
    DuplicateModulus(u64),

    #[error("plaintext modulus must be at least 2, got {0}")]
    InvalidPlaintextModulus(u64),

    #[error("noise standard deviation must be positive, got {0}")]
    InvalidSigma(f64),

    #[error("Hamming weight {h} must lie in 1..={n}")]
    InvalidHammingWeight { h: usize, n: usize },

    #[error("gadget base 2^{0} does not fit in a machine word")]
    InvalidLogBase(usize),
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, ParamsError>;
