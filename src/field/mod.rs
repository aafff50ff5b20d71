//! Field and curve substrate adapters
//!
//! Arithmetic comes from arkworks. This module only adds what the pipeline
//! needs on top: a canonical decimal encoding for scalars (used by the
//! public-inputs file) and a one-byte tag per supported pairing curve.

pub mod bls12_381;
pub mod bn254;

pub use ark_ff::{Field as ArkField, PrimeField};
pub use ark_bls12_381::{Bls12_381, Fr as Bls12381Fr};
pub use ark_bn254::{Bn254, Fr as Bn254Fr};

use ark_ec::pairing::Pairing;
use ark_ff::BigInteger;
use num_bigint::BigUint;

use crate::errors::{PipelineError, Result};

/// Canonical base-10 encoding of prime field elements
pub trait DecimalEncoding: PrimeField {
    /// Decimal string of the canonical representative in `[0, p)`.
    fn to_decimal_string(&self) -> String {
        BigUint::from_bytes_le(&self.into_bigint().to_bytes_le()).to_string()
    }

    /// Parse a canonical decimal string.
    ///
    /// Rejects anything but ASCII digits, and values `>= p`.
    fn from_decimal_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PipelineError::Serialization(format!(
                "not a decimal field element: {:?}",
                s
            )));
        }
        let value: BigUint = s
            .parse()
            .map_err(|e| PipelineError::Serialization(format!("{:?}: {}", s, e)))?;
        let modulus = BigUint::from_bytes_le(&Self::MODULUS.to_bytes_le());
        if value >= modulus {
            return Err(PipelineError::Serialization(format!(
                "field element {} exceeds the modulus",
                s
            )));
        }
        Ok(Self::from_le_bytes_mod_order(&value.to_bytes_le()))
    }
}

impl<F: PrimeField> DecimalEncoding for F {}

/// Pairing-friendly curve usable by the pipeline
pub trait PipelineCurve: Pairing {
    /// Tag written into artifact headers
    const CURVE_ID: u8;
    /// Human-readable name for logs
    const NAME: &'static str;
}

/// Look up a curve name by its artifact tag.
pub fn curve_name(id: u8) -> Option<&'static str> {
    if id == <Bn254 as PipelineCurve>::CURVE_ID {
        Some(<Bn254 as PipelineCurve>::NAME)
    } else if id == <Bls12_381 as PipelineCurve>::CURVE_ID {
        Some(<Bls12_381 as PipelineCurve>::NAME)
    } else {
        None
    }
}
