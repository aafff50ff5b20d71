//! PLONK over KZG commitments
//!
//! Follows the five-round protocol of Gabizon, Williamson and Ciobotaru
//! (ePrint 2019/953) on the gate table from [`crate::gates`]:
//!
//! 1. blinded wire polynomials a, b, c
//! 2. the copy-constraint accumulator z
//! 3. the quotient t, split into three pieces of width n
//! 4. evaluations at the challenge ζ
//! 5. opening proofs at ζ and ζω
//!
//! Selector and permutation commitments come from the SRS's Lagrange
//! basis, everything the prover blinds from its monomial powers. The
//! transcript absorbs the serialized verifying key and the public inputs
//! before any prover message.

mod prover;
mod setup;
pub mod transcript;
mod verifier;

pub use prover::prove;
pub use setup::{required_degree, setup};
pub use verifier::verify;

use ark_ec::pairing::Pairing;
use ark_poly::univariate::DensePolynomial;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::gates::GateSystem;
use crate::srs::Srs;

#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct VerifyingKey<E: Pairing> {
    pub domain_size: u64,
    pub num_public: u64,
    pub q_m: E::G1Affine,
    pub q_l: E::G1Affine,
    pub q_r: E::G1Affine,
    pub q_o: E::G1Affine,
    pub q_c: E::G1Affine,
    pub sigma_1: E::G1Affine,
    pub sigma_2: E::G1Affine,
    pub sigma_3: E::G1Affine,
    /// `[1]₂`
    pub g2: E::G2Affine,
    /// `[τ]₂`
    pub tau_g2: E::G2Affine,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvingKey<E: Pairing> {
    pub vk: VerifyingKey<E>,
    pub gates: GateSystem<E::ScalarField>,
    pub srs: Srs<E>,
    pub q_m: DensePolynomial<E::ScalarField>,
    pub q_l: DensePolynomial<E::ScalarField>,
    pub q_r: DensePolynomial<E::ScalarField>,
    pub q_o: DensePolynomial<E::ScalarField>,
    pub q_c: DensePolynomial<E::ScalarField>,
    pub sigma: [DensePolynomial<E::ScalarField>; 3],
    pub sigma_evals: [Vec<E::ScalarField>; 3],
}

#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<E: Pairing> {
    pub a: E::G1Affine,
    pub b: E::G1Affine,
    pub c: E::G1Affine,
    pub z: E::G1Affine,
    pub t_lo: E::G1Affine,
    pub t_mid: E::G1Affine,
    pub t_hi: E::G1Affine,
    pub w_zeta: E::G1Affine,
    pub w_zeta_omega: E::G1Affine,
    pub a_eval: E::ScalarField,
    pub b_eval: E::ScalarField,
    pub c_eval: E::ScalarField,
    pub sigma_1_eval: E::ScalarField,
    pub sigma_2_eval: E::ScalarField,
    pub z_omega_eval: E::ScalarField,
}
