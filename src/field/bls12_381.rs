//! BLS12-381 scalar field and pairing
//!
//! F_p arithmetic where p is the BLS12-381 scalar field order

use super::PipelineCurve;
pub use ark_bls12_381::{Bls12_381, Fr};

impl PipelineCurve for Bls12_381 {
    const CURVE_ID: u8 = 2;
    const NAME: &'static str = "BLS12-381";
}
