//! Binary parameter codec tests

use bfv_rlwe::error::{Chain, ParamsError};
use bfv_rlwe::params::{default_params, Parameters, ParametersLiteral, MAX_MODULI_COUNT};

#[test]
fn test_default_table_roundtrip() {
    for literal in default_params() {
        let params = Parameters::new(literal.clone()).unwrap();
        let bytes = params.to_bytes();
        assert_eq!(bytes.len(), 3 + 8 * (2 + literal.q.len() + literal.p.len()));

        let decoded = Parameters::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, params);
        assert_eq!(decoded.n(), params.n());
        assert_eq!(decoded.t(), params.t());
        assert_eq!(decoded.q(), params.q());
        assert_eq!(decoded.p(), params.p());
        assert_eq!(decoded.sigma(), 3.19);
    }
}

#[test]
fn test_sigma_rounded_to_two_decimals() {
    let mut literal = ParametersLiteral::new(10, 65537, vec![36028797014376449], vec![]);
    literal.sigma = 3.2049;
    let decoded = ParametersLiteral::from_bytes(&literal.to_bytes()).unwrap();
    assert_eq!(decoded.sigma, 3.2);
}

#[test]
fn test_short_buffers_rejected() {
    for len in 0..3 {
        let data = vec![10u8; len];
        assert_eq!(ParametersLiteral::from_bytes(&data), Err(ParamsError::TooShort(len)));
    }
}

#[test]
fn test_oversized_counts_rejected_before_body() {
    let too_many = (MAX_MODULI_COUNT + 1) as u8;

    assert_eq!(
        ParametersLiteral::from_bytes(&[12, too_many, 0]),
        Err(ParamsError::TooManyModuli {
            chain: Chain::Q,
            count: MAX_MODULI_COUNT + 1,
            max: MAX_MODULI_COUNT,
        })
    );
    assert_eq!(
        ParametersLiteral::from_bytes(&[12, 1, too_many]),
        Err(ParamsError::TooManyModuli {
            chain: Chain::P,
            count: MAX_MODULI_COUNT + 1,
            max: MAX_MODULI_COUNT,
        })
    );
    assert!(matches!(
        ParametersLiteral::from_bytes(&[17, 1, 0]),
        Err(ParamsError::DegreeTooLarge { log_n: 17, .. })
    ));
}

#[test]
fn test_truncated_body_rejected() {
    let bytes = Parameters::new(default_params()[1].clone()).unwrap().to_bytes();
    let cut = &bytes[..bytes.len() - 1];
    assert_eq!(
        ParametersLiteral::from_bytes(cut),
        Err(ParamsError::Truncated {
            expected: bytes.len(),
            actual: bytes.len() - 1,
        })
    );
}

#[test]
fn test_decoded_invalid_moduli_fail_validation() {
    let mut literal = ParametersLiteral::new(10, 65537, vec![36028797014376449], vec![]);
    literal.q = vec![97];
    let bytes = literal.to_bytes();

    // The codec only checks shape; building the parameters checks the math.
    assert!(ParametersLiteral::from_bytes(&bytes).is_ok());
    assert!(matches!(
        Parameters::from_bytes(&bytes),
        Err(ParamsError::NotNttFriendly { chain: Chain::Q, modulus: 97, .. })
    ));
}

#[test]
fn test_decoded_non_prime_moduli_fail_validation() {
    // 9 and 1 are both 1 mod 2N for N = 2.
    for modulus in [9, 1] {
        let bytes = ParametersLiteral::new(1, 65537, vec![modulus], vec![]).to_bytes();
        assert_eq!(
            Parameters::from_bytes(&bytes).err(),
            Some(ParamsError::NotPrime {
                chain: Chain::Q,
                modulus,
            })
        );
    }

    // A large composite in P must be rejected before any NTT table is built.
    let composite = 12289u64.pow(4);
    let literal = ParametersLiteral::new(10, 65537, vec![36028797014376449], vec![composite]);
    assert_eq!(
        Parameters::from_bytes(&literal.to_bytes()).err(),
        Some(ParamsError::NotPrime {
            chain: Chain::P,
            modulus: composite,
        })
    );
}

#[test]
fn test_equality_ignores_plaintext_modulus() {
    let a = ParametersLiteral::new(10, 65537, vec![36028797014376449], vec![]);
    let mut b = a.clone();
    b.t = 257;
    assert_eq!(a, b);

    b.sigma = 3.2;
    assert_ne!(a, b);
}
