//! Groth16 over a pairing-friendly curve
//!
//! The R1CS is lifted to a QAP over a radix-2 domain. Rows `0..m` hold the
//! constraints; rows `m..m + ℓ + 1` are input-consistency rows with
//! `A[m + j][j] = 1`, which makes the instance polynomials linearly
//! independent so that public inputs cannot be shifted between wires.
//!
//! - Setup samples τ, α, β, γ, δ from the caller's RNG and drops them
//!   before returning.
//! - Proofs are three group elements: A, C ∈ G1 and B ∈ G2.
//! - Verification is a single product of pairings against e(α, β).

mod prover;
mod qap;
mod setup;
mod verifier;

pub use prover::prove;
pub use setup::setup;
pub use verifier::{prepare_verifying_key, verify, verify_prepared};

use ark_ec::pairing::{Pairing, PairingOutput};
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, Read, SerializationError, Valid, Validate,
};

use crate::r1cs::R1CSInstance;
use crate::srs::MAX_SRS_DEGREE;

#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize)]
pub struct VerifyingKey<E: Pairing> {
    pub alpha_g1: E::G1Affine,
    pub beta_g2: E::G2Affine,
    pub gamma_g2: E::G2Affine,
    pub delta_g2: E::G2Affine,
    /// `[(β·u_j(τ) + α·v_j(τ) + w_j(τ)) / γ]₁` for the constant and each public input
    pub gamma_abc_g1: Vec<E::G1Affine>,
}

impl<E: Pairing> VerifyingKey<E> {
    pub fn num_public(&self) -> usize {
        self.gamma_abc_g1.len().saturating_sub(1)
    }
}

impl<E: Pairing> Valid for VerifyingKey<E> {
    fn check(&self) -> Result<(), SerializationError> {
        self.alpha_g1.check()?;
        self.beta_g2.check()?;
        self.gamma_g2.check()?;
        self.delta_g2.check()?;
        E::G1Affine::batch_check(self.gamma_abc_g1.iter())
    }
}

// Same layout as the derived encoding; the instance length prefix is
// bounded before anything is allocated for it.
impl<E: Pairing> CanonicalDeserialize for VerifyingKey<E> {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let alpha_g1 = E::G1Affine::deserialize_with_mode(&mut reader, compress, validate)?;
        let beta_g2 = E::G2Affine::deserialize_with_mode(&mut reader, compress, validate)?;
        let gamma_g2 = E::G2Affine::deserialize_with_mode(&mut reader, compress, validate)?;
        let delta_g2 = E::G2Affine::deserialize_with_mode(&mut reader, compress, validate)?;
        let len = u64::deserialize_with_mode(&mut reader, compress, validate)?;
        if len > MAX_SRS_DEGREE as u64 + 1 {
            return Err(SerializationError::InvalidData);
        }
        let gamma_abc_g1 = (0..len)
            .map(|_| E::G1Affine::deserialize_with_mode(&mut reader, compress, validate))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            alpha_g1,
            beta_g2,
            gamma_g2,
            delta_g2,
            gamma_abc_g1,
        })
    }
}

/// Verifying key with `e(α, β)` precomputed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedVerifyingKey<E: Pairing> {
    pub vk: VerifyingKey<E>,
    pub alpha_beta: PairingOutput<E>,
}

/// Proving key; carries the constraint system it was derived from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvingKey<E: Pairing> {
    pub vk: VerifyingKey<E>,
    pub beta_g1: E::G1Affine,
    pub delta_g1: E::G1Affine,
    /// `[u_j(τ)]₁` for every z column
    pub a_query: Vec<E::G1Affine>,
    /// `[v_j(τ)]₁`
    pub b_g1_query: Vec<E::G1Affine>,
    /// `[v_j(τ)]₂`
    pub b_g2_query: Vec<E::G2Affine>,
    /// `[τ^i · t(τ) / δ]₁` for `i < n - 1`
    pub h_query: Vec<E::G1Affine>,
    /// `[(β·u_j(τ) + α·v_j(τ) + w_j(τ)) / δ]₁` for private columns
    pub l_query: Vec<E::G1Affine>,
    pub r1cs: R1CSInstance<E::ScalarField>,
}

#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof<E: Pairing> {
    pub a: E::G1Affine,
    pub b: E::G2Affine,
    pub c: E::G1Affine,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{Circuit, CircuitBuilder, CircuitDefinition, CubicCircuit};
    use crate::errors::{PipelineError, Result};
    use crate::field::{Bls12_381, Bn254};
    use crate::r1cs::compile;
    use crate::witness::{generate, PublicWitness};
    use ark_ec::AffineRepr;
    use ark_ff::PrimeField;
    use ark_std::test_rng;

    /// Same public shape as the cubic circuit: `y == x^2 + 2`
    struct Square;

    impl<F: PrimeField> Circuit<F> for Square {
        fn define(&self, api: &mut CircuitBuilder<F>) -> Result<()> {
            let x = api.private_input("x")?;
            let y = api.public_input("y")?;
            let x2 = api.mul(x, x);
            api.assert_equal(y, x2 + api.constant(F::from(2u64)));
            Ok(())
        }
    }

    fn cubic_round_trip<E: Pairing>() {
        let mut rng = test_rng();
        let def = CircuitDefinition::<E::ScalarField>::from_circuit(&CubicCircuit).unwrap();
        let r1cs = compile(&def).unwrap();
        let (pk, vk) = setup::<E, _>(&r1cs, &mut rng).unwrap();
        let witness = generate(&def, &CubicCircuit::assignment(3, 35)).unwrap();
        let proof = prove(&pk, &witness, &mut rng).unwrap();

        assert!(verify(&vk, &witness.public(), &proof).unwrap());
        let wrong = PublicWitness(vec![E::ScalarField::from(36u64)]);
        assert!(!verify(&vk, &wrong, &proof).unwrap());
    }

    #[test]
    fn cubic_bn254() {
        cubic_round_trip::<Bn254>();
    }

    #[test]
    fn cubic_bls12_381() {
        cubic_round_trip::<Bls12_381>();
    }

    #[test]
    fn proofs_are_randomized() {
        let mut rng = test_rng();
        let def = CircuitDefinition::from_circuit(&CubicCircuit).unwrap();
        let (pk, vk) = setup::<Bn254, _>(&compile(&def).unwrap(), &mut rng).unwrap();
        let witness = generate(&def, &CubicCircuit::assignment(3, 35)).unwrap();
        let p1 = prove(&pk, &witness, &mut rng).unwrap();
        let p2 = prove(&pk, &witness, &mut rng).unwrap();
        assert_ne!(p1, p2);
        assert!(verify(&vk, &witness.public(), &p2).unwrap());
    }

    #[test]
    fn key_from_other_circuit_rejects() {
        let mut rng = test_rng();
        let cubic = CircuitDefinition::from_circuit(&CubicCircuit).unwrap();
        let square = CircuitDefinition::from_circuit(&Square).unwrap();
        let (pk, _) = setup::<Bn254, _>(&compile(&cubic).unwrap(), &mut rng).unwrap();
        let (_, other_vk) = setup::<Bn254, _>(&compile(&square).unwrap(), &mut rng).unwrap();
        let witness = generate(&cubic, &CubicCircuit::assignment(3, 35)).unwrap();
        let proof = prove(&pk, &witness, &mut rng).unwrap();
        assert!(!verify(&other_vk, &witness.public(), &proof).unwrap());
    }

    #[test]
    fn tampered_witness_fails_to_prove() {
        let mut rng = test_rng();
        let def = CircuitDefinition::from_circuit(&CubicCircuit).unwrap();
        let (pk, _) = setup::<Bn254, _>(&compile(&def).unwrap(), &mut rng).unwrap();
        let witness = generate(&def, &CubicCircuit::assignment(3, 35))
            .unwrap()
            .tampered(def.public_variables()[0], 36u64.into());
        assert!(matches!(prove(&pk, &witness, &mut rng), Err(PipelineError::Proving(_))));
    }

    #[test]
    fn wrong_public_input_count_is_malformed() {
        let mut rng = test_rng();
        let def = CircuitDefinition::from_circuit(&CubicCircuit).unwrap();
        let (pk, vk) = setup::<Bn254, _>(&compile(&def).unwrap(), &mut rng).unwrap();
        let witness = generate(&def, &CubicCircuit::assignment(3, 35)).unwrap();
        let proof = prove(&pk, &witness, &mut rng).unwrap();
        let two = PublicWitness(vec![35u64.into(), 1u64.into()]);
        assert!(matches!(
            verify(&vk, &two, &proof),
            Err(PipelineError::VerificationInput(_))
        ));
    }

    #[test]
    fn forged_identity_proof_rejects() {
        let mut rng = test_rng();
        let def = CircuitDefinition::from_circuit(&CubicCircuit).unwrap();
        let (_, vk) = setup::<Bn254, _>(&compile(&def).unwrap(), &mut rng).unwrap();
        let forged = Proof::<Bn254> {
            a: <Bn254 as Pairing>::G1Affine::zero(),
            b: <Bn254 as Pairing>::G2Affine::zero(),
            c: <Bn254 as Pairing>::G1Affine::zero(),
        };
        let public = PublicWitness(vec![35u64.into()]);
        assert!(!verify(&vk, &public, &forged).unwrap());
    }

    #[test]
    fn prepared_key_matches_plain_verification() {
        let mut rng = test_rng();
        let def = CircuitDefinition::from_circuit(&CubicCircuit).unwrap();
        let (pk, vk) = setup::<Bn254, _>(&compile(&def).unwrap(), &mut rng).unwrap();
        let witness = generate(&def, &CubicCircuit::assignment(3, 35)).unwrap();
        let proof = prove(&pk, &witness, &mut rng).unwrap();
        let pvk = prepare_verifying_key(&vk);
        assert!(verify_prepared(&pvk, witness.public().values(), &proof).unwrap());
        assert_eq!(vk.num_public(), 1);
    }
}
