//! Ring arithmetic for RLWE encryption.
//!
//! Everything here works on polynomials over R_Q = Z_Q[X]/(X^n + 1) held in
//! residue number system form, one word-sized prime per row:
//!
//! - **Modular arithmetic** per prime, with Montgomery reduction
//! - **Number-Theoretic Transform (NTT)** for negacyclic products
//! - **Rings** over a Q chain and an optional auxiliary P chain, with
//!   level-parameterized operations
//! - **Basis extension** from Q into P and mod-down from Q∪P to Q
//! - **Sampling** of Gaussian, ternary and uniform polynomials
//!
//! # Example
//!
//! ```
//! use bfv_rlwe::math::{Domain, Ring};
//!
//! let ring = Ring::new(16, &[36028797014376449, 36028797013327873]);
//! let mut p = ring.new_poly();
//! p.row_mut(0)[1] = 1;
//! ring.ntt_lvl(1, &mut p);
//! assert_eq!(p.domain(), Domain::Ntt);
//! ring.inv_ntt_lvl(1, &mut p);
//! assert_eq!(p.row(0)[1], 1);
//! ```

pub mod basis;
pub mod crt;
pub mod gaussian;
pub mod modular;
pub mod ntt;
pub mod poly;
pub mod ring;
pub mod ring_qp;
pub mod sampling;

pub use basis::BasisExtender;
pub use crt::{mod_inverse, modulus_product};
pub use gaussian::GaussianSampler;
pub use modular::{is_prime, Modulus};
pub use ntt::NttTable;
pub use poly::{Domain, Poly};
pub use ring::Ring;
pub use ring_qp::{PolyQP, RingQP};
pub use sampling::{fresh_rng, TernarySampler, UniformSampler};
