//! Parameter sets for BFV/RLWE encryption
//!
//! A [`ParametersLiteral`] is plain, serializable data: ring degree,
//! plaintext modulus, the ciphertext chain Q, the optional auxiliary chain P,
//! the noise width and the key and gadget settings. [`Parameters`] is the
//! validated form, holding the ring contexts behind an `Arc` so clones are
//! cheap and can be handed to every worker.

use std::sync::Arc;

use byteorder::{BigEndian, ByteOrder};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Chain, ParamsError, Result};
use crate::math::crt::modulus_product;
use crate::math::{is_prime, Ring, RingQP};

/// Largest supported log2 of the ring degree
pub const MAX_LOG_N: usize = 16;

/// Largest supported ring degree
pub const MAX_N: usize = 1 << MAX_LOG_N;

/// Largest number of moduli in either chain
pub const MAX_MODULI_COUNT: usize = 34;

/// Default Gaussian standard deviation
pub const DEFAULT_SIGMA: f64 = crate::math::gaussian::DEFAULT_SIGMA;

/// Default Hamming weight of ternary secrets
pub const DEFAULT_HAMMING_WEIGHT: usize = 192;

/// Moduli must stay below this bound
const MAX_MODULUS_BITS: u32 = 61;

/// Three header bytes, then T and σ as 64-bit words
const HEADER_LEN: usize = 3;

/// Single 56-bit prime, NTT-friendly up to N = 2^19.
pub const LOGN11_Q56: [u64; 1] = [72057594036879361];

const LOGN12_Q110: [u64; 2] = [36028797014376449, 36028797013327873];

const LOGN13_Q219: [u64; 4] = [
    36028797014376449,
    36028797013327873,
    36028797010444289,
    18014398506729473,
];

const LOGN14_Q441: [u64; 8] = [
    72057594036879361,
    36028797014376449,
    36028797013327873,
    36028797010444289,
    36028797005856769,
    36028797001138177,
    36028796997599233,
    36028796996681729,
];

const LOGN15_Q885: [u64; 15] = [
    576460752300015617,
    576460752298835969,
    576460752298180609,
    576460752289923073,
    576460752289529857,
    576460752289005569,
    576460752286253057,
    576460752284418049,
    576460752279306241,
    576460752273801217,
    576460752272228353,
    576460752267509761,
    576460752265543681,
    576460752260694017,
    576460752259645441,
];

/// 60-bit NTT-friendly primes used as auxiliary moduli, largest last.
/// Presets take a suffix of this list.
const SPECIAL_PRIMES_60: [u64; 17] = [
    576460752520609793,
    576460752522969089,
    576460752523100161,
    576460752524279809,
    576460752525852673,
    576460752526245889,
    576460752526508033,
    576460752532013057,
    576460752545120257,
    576460752550100993,
    576460752551804929,
    576460752567402497,
    576460752568975361,
    576460752573431809,
    576460752580902913,
    576460752585490433,
    576460752586407937,
];

fn special_primes(count: usize) -> Vec<u64> {
    SPECIAL_PRIMES_60[SPECIAL_PRIMES_60.len() - count..].to_vec()
}

/// Default parameter sets with increasing homomorphic capacity.
///
/// # Returns
///
/// Entries for N = 4096, 8192, 16384 and 32768, each with T = 65537,
/// σ = 3.19 and an auxiliary chain.
pub fn default_params() -> Vec<ParametersLiteral> {
    vec![
        ParametersLiteral::new(12, 65537, LOGN12_Q110.to_vec(), special_primes(3)),
        ParametersLiteral::new(13, 65537, LOGN13_Q219.to_vec(), special_primes(5)),
        ParametersLiteral::new(14, 65537, LOGN14_Q441.to_vec(), special_primes(9)),
        ParametersLiteral::new(15, 65537, LOGN15_Q885.to_vec(), special_primes(17)),
    ]
}

/// Plain description of a parameter set.
///
/// # Fields
///
/// * `log_n` - log2 of the ring degree N
/// * `t` - Plaintext modulus T
/// * `q` - Ciphertext modulus chain
/// * `p` - Auxiliary modulus chain, possibly empty
/// * `sigma` - Standard deviation of the error distribution
/// * `h` - Hamming weight of ternary secrets and masks
/// * `log_base2` - Gadget base of RGSW encryption as a bit count, 0 to disable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParametersLiteral {
    pub log_n: usize,
    pub t: u64,
    pub q: Vec<u64>,
    pub p: Vec<u64>,
    pub sigma: f64,
    #[serde(default = "default_hamming_weight")]
    pub h: usize,
    #[serde(default)]
    pub log_base2: usize,
}

fn default_hamming_weight() -> usize {
    DEFAULT_HAMMING_WEIGHT
}

impl PartialEq for ParametersLiteral {
    /// N, Q, P and σ decide equality; T, h and the gadget base do not.
    fn eq(&self, other: &Self) -> bool {
        self.log_n == other.log_n
            && self.q == other.q
            && self.p == other.p
            && self.sigma == other.sigma
    }
}

impl ParametersLiteral {
    /// Literal with the default σ, Hamming weight and no gadget base.
    pub fn new(log_n: usize, t: u64, q: Vec<u64>, p: Vec<u64>) -> Self {
        Self {
            log_n,
            t,
            q,
            p,
            sigma: DEFAULT_SIGMA,
            h: DEFAULT_HAMMING_WEIGHT.min(1 << log_n.min(MAX_LOG_N)),
            log_base2: 0,
        }
    }

    pub fn n(&self) -> usize {
        1 << self.log_n
    }

    /// Serializes to the binary parameter format.
    ///
    /// Layout (big-endian): `log2(N)`, `|Q|`, `|P|` as single bytes, then
    /// T, σ·2^32 and every Q and P modulus as 64-bit words.
    pub fn to_bytes(&self) -> Vec<u8> {
        let words = 2 + self.q.len() + self.p.len();
        let mut buf = vec![0u8; HEADER_LEN + 8 * words];
        buf[0] = self.log_n as u8;
        buf[1] = self.q.len() as u8;
        buf[2] = self.p.len() as u8;

        let body = std::iter::once(self.t)
            .chain(std::iter::once((self.sigma * (1u64 << 32) as f64).round() as u64))
            .chain(self.q.iter().copied())
            .chain(self.p.iter().copied());
        for (chunk, word) in buf[HEADER_LEN..].chunks_exact_mut(8).zip(body) {
            BigEndian::write_u64(chunk, word);
        }
        buf
    }

    /// Parses the binary parameter format.
    ///
    /// The header is checked before anything is allocated. σ is rounded
    /// to two decimals; `h` and `log_base2` are not encoded and come back
    /// as their defaults.
    ///
    /// # Errors
    ///
    /// `TooShort`, `DegreeTooLarge`, `TooManyModuli` or `Truncated`,
    /// checked in that order.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(ParamsError::TooShort(data.len()));
        }

        let log_n = data[0] as usize;
        if log_n > MAX_LOG_N {
            return Err(ParamsError::DegreeTooLarge { log_n, max: MAX_LOG_N });
        }
        let q_count = data[1] as usize;
        if q_count > MAX_MODULI_COUNT {
            return Err(ParamsError::TooManyModuli {
                chain: Chain::Q,
                count: q_count,
                max: MAX_MODULI_COUNT,
            });
        }
        let p_count = data[2] as usize;
        if p_count > MAX_MODULI_COUNT {
            return Err(ParamsError::TooManyModuli {
                chain: Chain::P,
                count: p_count,
                max: MAX_MODULI_COUNT,
            });
        }

        let expected = HEADER_LEN + 8 * (2 + q_count + p_count);
        if data.len() < expected {
            return Err(ParamsError::Truncated {
                expected,
                actual: data.len(),
            });
        }

        let word =
            |i: usize| BigEndian::read_u64(&data[HEADER_LEN + 8 * i..HEADER_LEN + 8 * (i + 1)]);
        let sigma = word(1) as f64 / (1u64 << 32) as f64;

        let mut literal = Self::new(
            log_n,
            word(0),
            (0..q_count).map(|i| word(2 + i)).collect(),
            (0..p_count).map(|i| word(2 + q_count + i)).collect(),
        );
        literal.sigma = (sigma * 100.0).round() / 100.0;
        Ok(literal)
    }

    /// Checks every invariant `Parameters` relies on.
    pub fn validate(&self) -> Result<()> {
        if self.log_n > MAX_LOG_N {
            return Err(ParamsError::DegreeTooLarge {
                log_n: self.log_n,
                max: MAX_LOG_N,
            });
        }
        if self.log_n == 0 {
            return Err(ParamsError::DegreeTooSmall);
        }
        if self.q.is_empty() {
            return Err(ParamsError::EmptyModulusChain);
        }
        for (chain, moduli) in [(Chain::Q, &self.q), (Chain::P, &self.p)] {
            if moduli.len() > MAX_MODULI_COUNT {
                return Err(ParamsError::TooManyModuli {
                    chain,
                    count: moduli.len(),
                    max: MAX_MODULI_COUNT,
                });
            }
            let two_n = 2 * self.n() as u64;
            for &modulus in moduli {
                if modulus >> MAX_MODULUS_BITS != 0 {
                    return Err(ParamsError::ModulusTooLarge { chain, modulus });
                }
                if modulus % two_n != 1 {
                    return Err(ParamsError::NotNttFriendly {
                        chain,
                        modulus,
                        n: self.n(),
                    });
                }
                if !is_prime(modulus) {
                    return Err(ParamsError::NotPrime { chain, modulus });
                }
            }
        }

        let mut all: Vec<u64> = self.q.iter().chain(&self.p).copied().collect();
        all.sort_unstable();
        if let Some(w) = all.windows(2).find(|w| w[0] == w[1]) {
            return Err(ParamsError::DuplicateModulus(w[0]));
        }

        if self.t < 2 {
            return Err(ParamsError::InvalidPlaintextModulus(self.t));
        }
        if !(self.sigma > 0.0) {
            return Err(ParamsError::InvalidSigma(self.sigma));
        }
        if self.h == 0 || self.h > self.n() {
            return Err(ParamsError::InvalidHammingWeight { h: self.h, n: self.n() });
        }
        if self.log_base2 >= 64 {
            return Err(ParamsError::InvalidLogBase(self.log_base2));
        }
        Ok(())
    }
}

/// Validated parameter set with shared ring contexts.
///
/// Cloning shares the rings; two `Parameters` are equal when their literals
/// are.
///
/// # Example
///
/// ```
/// use bfv_rlwe::params::{default_params, Parameters};
///
/// let params = Parameters::new(default_params()[0].clone()).unwrap();
/// assert_eq!(params.n(), 4096);
/// assert_eq!(params.max_level_p(), Some(2));
/// ```
#[derive(Clone)]
pub struct Parameters {
    literal: ParametersLiteral,
    ring_qp: Arc<RingQP>,
}

impl Parameters {
    /// Validates `literal` and builds the NTT tables of both chains.
    pub fn new(literal: ParametersLiteral) -> Result<Self> {
        literal.validate()?;

        let n = literal.n();
        let ring_q = Ring::new(n, &literal.q);
        let ring_p = (!literal.p.is_empty()).then(|| Ring::new(n, &literal.p));

        debug!(
            log_n = literal.log_n,
            q_count = literal.q.len(),
            p_count = literal.p.len(),
            "built ring contexts"
        );

        Ok(Self {
            literal,
            ring_qp: Arc::new(RingQP::new(ring_q, ring_p)),
        })
    }

    /// Decodes and validates the binary parameter format.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::new(ParametersLiteral::from_bytes(data)?)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.literal.to_bytes()
    }

    pub fn literal(&self) -> &ParametersLiteral {
        &self.literal
    }

    pub fn n(&self) -> usize {
        self.literal.n()
    }

    pub fn log_n(&self) -> usize {
        self.literal.log_n
    }

    pub fn t(&self) -> u64 {
        self.literal.t
    }

    pub fn q(&self) -> &[u64] {
        &self.literal.q
    }

    pub fn p(&self) -> &[u64] {
        &self.literal.p
    }

    pub fn sigma(&self) -> f64 {
        self.literal.sigma
    }

    pub fn h(&self) -> usize {
        self.literal.h
    }

    pub fn log_base2(&self) -> usize {
        self.literal.log_base2
    }

    pub fn max_level_q(&self) -> usize {
        self.literal.q.len() - 1
    }

    /// Highest P level, `None` without an auxiliary chain.
    pub fn max_level_p(&self) -> Option<usize> {
        self.literal.p.len().checked_sub(1)
    }

    pub fn ring_q(&self) -> &Ring {
        self.ring_qp.ring_q()
    }

    pub fn ring_p(&self) -> Option<&Ring> {
        self.ring_qp.ring_p()
    }

    pub fn ring_qp(&self) -> &RingQP {
        &self.ring_qp
    }

    /// Exact product of `P[0..=level_p]`.
    pub fn p_product(&self, level_p: usize) -> BigUint {
        match self.ring_p() {
            Some(ring_p) if Some(level_p) == self.max_level_p() => ring_p.modulus_bigint().clone(),
            _ => modulus_product(&self.literal.p[..=level_p]),
        }
    }

    /// Number of RNS digits of the gadget decomposition at a level pair.
    pub fn decomp_rns(&self, level_q: usize, level_p: Option<usize>) -> usize {
        match level_p {
            None => level_q + 1,
            Some(lp) => (level_q + 1 + lp) / (lp + 1),
        }
    }

    /// Number of base-2^`log_base2` digits per RNS digit.
    ///
    /// Power-of-two decomposition only combines with at most one auxiliary
    /// prime, so anything above `level_p = 0` counts a single digit.
    pub fn decomp_bit(&self, level_q: usize, level_p: Option<usize>) -> usize {
        let log_base2 = self.log_base2();
        if log_base2 == 0 || level_p.is_some_and(|lp| lp > 0) {
            return 1;
        }
        let max_bits = self.ring_q().moduli()[..=level_q]
            .iter()
            .chain(level_p.and_then(|lp| self.ring_p().map(|r| &r.moduli()[..=lp])).unwrap_or(&[]))
            .map(|m| m.bits())
            .max()
            .unwrap_or(0);
        max_bits.div_ceil(log_base2)
    }
}

impl PartialEq for Parameters {
    fn eq(&self, other: &Self) -> bool {
        self.literal == other.literal
    }
}

impl std::fmt::Debug for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameters")
            .field("log_n", &self.literal.log_n)
            .field("t", &self.literal.t)
            .field("q", &self.literal.q)
            .field("p", &self.literal.p)
            .field("sigma", &self.literal.sigma)
            .finish()
    }
}
