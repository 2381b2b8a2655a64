//! Modular arithmetic over a single word-sized prime.
//!
//! Each residue row of an RNS polynomial is reduced by its own [`Modulus`],
//! which carries the constants for Montgomery multiplication with `R = 2^64`.

use serde::{Deserialize, Serialize};

/// A prime modulus q < 2^62 with precomputed Montgomery constants.
///
/// # Fields
///
/// * `value` - The modulus q
/// * `q_inv_neg` - -q^(-1) mod 2^64
/// * `r_squared` - R^2 mod q, used to enter Montgomery form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modulus {
    value: u64,
    q_inv_neg: u64,
    r_squared: u64,
}

impl Modulus {
    /// Precomputes the Montgomery constants for `q`.
    ///
    /// # Panics
    ///
    /// Panics if `q` is even or not below 2^62.
    pub fn new(q: u64) -> Self {
        assert!(q & 1 == 1, "modulus must be odd");
        assert!(q < (1u64 << 62), "modulus must be below 2^62");

        Self {
            value: q,
            q_inv_neg: Self::compute_q_inv_neg(q),
            r_squared: Self::compute_r_squared(q),
        }
    }

    /// Returns q.
    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Bit length of q.
    pub fn bits(&self) -> usize {
        (64 - self.value.leading_zeros()) as usize
    }

    #[inline]
    pub fn add(&self, a: u64, b: u64) -> u64 {
        let sum = a + b;
        if sum >= self.value {
            sum - self.value
        } else {
            sum
        }
    }

    #[inline]
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        if a >= b {
            a - b
        } else {
            self.value - b + a
        }
    }

    #[inline]
    pub fn neg(&self, a: u64) -> u64 {
        if a == 0 {
            0
        } else {
            self.value - a
        }
    }

    /// Plain (non-Montgomery) product modulo q.
    #[inline]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        ((a as u128 * b as u128) % self.value as u128) as u64
    }

    #[inline]
    pub fn reduce(&self, a: u64) -> u64 {
        a % self.value
    }

    /// Montgomery reduction of a product: returns a·b·R^(-1) mod q.
    ///
    /// With `b` in Montgomery form this is the standard product a·b mod q.
    #[inline]
    pub fn mred(&self, a: u64, b: u64) -> u64 {
        let ab = (a as u128) * (b as u128);
        let m = ((ab as u64).wrapping_mul(self.q_inv_neg)) as u128;
        let t = ((ab + m * (self.value as u128)) >> 64) as u64;
        if t >= self.value {
            t - self.value
        } else {
            t
        }
    }

    /// Enters Montgomery form: a·R mod q.
    #[inline]
    pub fn mform(&self, a: u64) -> u64 {
        self.mred(a, self.r_squared)
    }

    /// Leaves Montgomery form: a·R^(-1) mod q.
    #[inline]
    pub fn inv_mform(&self, a: u64) -> u64 {
        self.mred(a, 1)
    }

    /// Maps a signed integer into [0, q).
    #[inline]
    pub fn from_signed(&self, val: i64) -> u64 {
        if val >= 0 {
            (val as u64) % self.value
        } else {
            self.neg(val.unsigned_abs() % self.value)
        }
    }

    /// Centered representative in [-q/2, q/2).
    #[inline]
    pub fn to_signed(&self, val: u64) -> i64 {
        if val <= self.value / 2 {
            val as i64
        } else {
            -((self.value - val) as i64)
        }
    }

    pub fn pow(&self, mut base: u64, mut exp: u64) -> u64 {
        let mut result = 1u64;
        base %= self.value;
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(result, base);
            }
            exp >>= 1;
            base = self.mul(base, base);
        }
        result
    }

    fn compute_q_inv_neg(q: u64) -> u64 {
        let mut y: u64 = 1;
        for i in 1..64 {
            let yi = y.wrapping_mul(q) & (1u64 << i);
            y |= yi;
        }
        y.wrapping_neg()
    }

    fn compute_r_squared(q: u64) -> u64 {
        let r_mod_q = (1u128 << 64) % (q as u128);
        ((r_mod_q * r_mod_q) % (q as u128)) as u64
    }
}

/// Deterministic Miller-Rabin primality test for 64-bit integers.
///
/// The first twelve primes as witnesses are exact for every `n < 2^64`.
pub fn is_prime(n: u64) -> bool {
    const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

    if n < 2 {
        return false;
    }
    for &w in &WITNESSES {
        if n % w == 0 {
            return n == w;
        }
    }

    let mul = |a: u64, b: u64| ((a as u128 * b as u128) % n as u128) as u64;
    let pow = |mut base: u64, mut exp: u64| {
        let mut result = 1u64;
        while exp > 0 {
            if exp & 1 == 1 {
                result = mul(result, base);
            }
            exp >>= 1;
            base = mul(base, base);
        }
        result
    };

    let s = (n - 1).trailing_zeros();
    let d = (n - 1) >> s;
    'witness: for &w in &WITNESSES {
        let mut x = pow(w, d);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = mul(x, x);
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}
