//! BN254 (alt_bn128) scalar field and pairing

use super::PipelineCurve;
pub use ark_bn254::{Bn254, Fr};

impl PipelineCurve for Bn254 {
    const CURVE_ID: u8 = 1;
    const NAME: &'static str = "BN254";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::DecimalEncoding;
    use ark_ff::{FftField, Field, One, PrimeField, Zero};
    use ark_std::{test_rng, UniformRand};

    const MODULUS_DEC: &str =
        "21888242871839275222246405745257275088548364400416034343698204186575808495617";

    #[test]
    fn small_values_encode_as_plain_decimal() {
        assert_eq!(Fr::zero().to_decimal_string(), "0");
        assert_eq!(Fr::from(35u64).to_decimal_string(), "35");
    }

    #[test]
    fn minus_one_encodes_as_modulus_minus_one() {
        let s = (-Fr::one()).to_decimal_string();
        assert_eq!(
            s,
            "21888242871839275222246405745257275088548364400416034343698204186575808495616"
        );
    }

    #[test]
    fn decimal_round_trip() {
        let mut rng = test_rng();
        for _ in 0..100 {
            let a = Fr::rand(&mut rng);
            let s = a.to_decimal_string();
            assert_eq!(Fr::from_decimal_str(&s).unwrap(), a);
        }
    }

    #[test]
    fn rejects_non_canonical() {
        assert!(Fr::from_decimal_str(MODULUS_DEC).is_err());
        assert!(Fr::from_decimal_str("").is_err());
        assert!(Fr::from_decimal_str("-1").is_err());
        assert!(Fr::from_decimal_str("+1").is_err());
        assert!(Fr::from_decimal_str("1_000").is_err());
        assert!(Fr::from_decimal_str("0x10").is_err());
    }

    #[test]
    fn generator_is_not_in_small_subgroups() {
        // Coset shifts for copy constraints rely on this.
        let g = Fr::GENERATOR;
        assert_ne!(g.pow([1u64 << 20]), Fr::one());
        assert_eq!(Fr::MODULUS_BIT_SIZE, 254);
    }
}
