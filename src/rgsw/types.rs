//! RGSW ciphertext type.

use serde::{Deserialize, Serialize};

use crate::math::{Domain, PolyQP};
use crate::params::Parameters;

/// RGSW ciphertext: a grid of RLWE encryptions of zero, two rows per gadget
/// position, with the plaintext folded in at each position's scale.
///
/// Indexed `value[rns][bit][row][col]`. For every position the pair
/// `(value[i][j][r][0], value[i][j][r][1])` = (a, b) satisfies, over the Q
/// residues of RNS digit i,
///
/// - row 0: a + b·s = e + P·B^j·m
/// - row 1: a + b·s = e + P·B^j·m·s
///
/// with P the product of the active auxiliary primes (1 without P) and B the
/// power-of-two gadget base. All entries are in the NTT domain and
/// Montgomery form.
///
/// # Fields
///
/// * `value` - The gadget grid
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgswCiphertext {
    pub value: Vec<Vec<[[PolyQP; 2]; 2]>>,
}

impl RgswCiphertext {
    /// Zero grid with `decomp_rns × decomp_bit` positions at the given
    /// levels, every entry tagged `Ntt`.
    ///
    /// # Example
    ///
    /// ```
    /// use bfv_rlwe::params::{default_params, Parameters};
    /// use bfv_rlwe::rgsw::RgswCiphertext;
    ///
    /// let params = Parameters::new(default_params()[0].clone()).unwrap();
    /// let ct = RgswCiphertext::new(&params, 1, Some(0));
    /// assert_eq!(ct.decomp_rns(), 2);
    /// assert_eq!(ct.decomp_bit(), 1);
    /// ```
    pub fn new(params: &Parameters, level_q: usize, level_p: Option<usize>) -> Self {
        let ring_qp = params.ring_qp();
        let level_p = level_p.filter(|_| ring_qp.ring_p().is_some());
        let decomp_rns = params.decomp_rns(level_q, level_p);
        let decomp_bit = params.decomp_bit(level_q, level_p);

        let entry = || {
            let mut p = ring_qp.new_poly_lvl(level_q, level_p);
            p.set_domain(Domain::Ntt);
            p
        };

        let value = (0..decomp_rns)
            .map(|_| {
                (0..decomp_bit)
                    .map(|_| [[entry(), entry()], [entry(), entry()]])
                    .collect()
            })
            .collect();

        Self { value }
    }

    pub fn level_q(&self) -> usize {
        self.value[0][0][0][0].level_q()
    }

    /// Auxiliary level, `None` when the grid has no P part.
    pub fn level_p(&self) -> Option<usize> {
        self.value[0][0][0][0].level_p()
    }

    pub fn decomp_rns(&self) -> usize {
        self.value.len()
    }

    pub fn decomp_bit(&self) -> usize {
        self.value.first().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParametersLiteral;

    #[test]
    fn test_grid_without_p_uses_bit_digits() {
        let mut lit = ParametersLiteral::new(
            6,
            65537,
            vec![36028797014376449, 36028797013327873, 36028797010444289],
            vec![],
        );
        lit.log_base2 = 20;
        let params = Parameters::new(lit).unwrap();
        let ct = RgswCiphertext::new(&params, 2, None);

        assert_eq!(ct.decomp_rns(), 3);
        assert_eq!(ct.decomp_bit(), 3);
        assert_eq!(ct.level_q(), 2);
        assert_eq!(ct.level_p(), None);
        assert!(ct.value[2][2][1][1].q.is_ntt());
    }

    #[test]
    fn test_grid_with_uneven_p_rounds_up() {
        let params = Parameters::new(ParametersLiteral::new(
            6,
            65537,
            vec![36028797014376449, 36028797013327873, 36028797010444289],
            vec![576460752586407937, 576460752585490433],
        ))
        .unwrap();
        let ct = RgswCiphertext::new(&params, 2, Some(1));

        assert_eq!(ct.decomp_rns(), 2);
        assert_eq!(ct.decomp_bit(), 1);
        assert_eq!(ct.level_p(), Some(1));
    }
}
