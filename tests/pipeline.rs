//! End-to-end properties for both backends on both curves

use ark_std::rand::rngs::StdRng;
use ark_std::rand::SeedableRng;
use ark_std::test_rng;
use rayon::prelude::*;

use nizk_pipeline::circuit::{Circuit, CircuitBuilder, CircuitDefinition, CubicCircuit};
use nizk_pipeline::field::{Bls12_381, Bn254, Bn254Fr, PipelineCurve, PrimeField};
use nizk_pipeline::pipeline::run;
use nizk_pipeline::srs::{SrsProvider, UnsafeSrsProvider};
use nizk_pipeline::witness::{generate, public_witness, Assignment, PublicWitness};
use nizk_pipeline::{Groth16, PipelineError, Plonk, ProofSystem, Result};

/// `y == x^2 + 2`: one public input, like the cubic circuit
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

/// Two public outputs over shared intermediates with a wide sum
struct Polynomials;

impl<F: PrimeField> Circuit<F> for Polynomials {
    fn define(&self, api: &mut CircuitBuilder<F>) -> Result<()> {
        let a = api.private_input("a")?;
        let b = api.private_input("b")?;
        let c = api.private_input("c")?;
        let sum = api.public_input("sum")?;
        let product = api.public_input("product")?;
        let ab = api.mul(a, b);
        let abc = api.mul(ab, c);
        let wide = api.add(a, b) + api.scale(c, F::from(3u64)) + ab + api.constant(F::from(7u64));
        api.assert_equal(sum, wide);
        api.assert_equal(product, abc);
        Ok(())
    }
}

fn keys<E, S, C>(circuit: &C) -> (CircuitDefinition<E::ScalarField>, S::ProvingKey, S::VerifyingKey)
where
    E: PipelineCurve,
    S: ProofSystem<E>,
    C: Circuit<E::ScalarField>,
{
    let mut rng = test_rng();
    let def = CircuitDefinition::from_circuit(circuit).unwrap();
    let cs = S::compile(&def).unwrap();
    let srs = S::srs_size(&cs)
        .map(|(d, n)| SrsProvider::<E>::provide(&UnsafeSrsProvider, d, n, &mut rng).unwrap());
    let (pk, vk) = S::setup(&cs, srs.as_ref(), &mut rng).unwrap();
    (def, pk, vk)
}

fn completeness_and_soundness<E: PipelineCurve, S: ProofSystem<E>>() {
    let mut rng = test_rng();
    let run = run::<E, S, _, _, _>(
        &CubicCircuit,
        &CubicCircuit::assignment(3, 35),
        &UnsafeSrsProvider,
        &mut rng,
    )
    .unwrap();
    let expected = PublicWitness(vec![E::ScalarField::from(35u64)]);
    assert_eq!(run.public, expected);
    assert!(S::verify(&run.verifying_key, &expected, &run.proof).unwrap());

    let wrong = PublicWitness(vec![E::ScalarField::from(36u64)]);
    assert!(!S::verify(&run.verifying_key, &wrong, &run.proof).unwrap());
}

#[test]
fn groth16_bn254_end_to_end() {
    completeness_and_soundness::<Bn254, Groth16<Bn254>>();
}

#[test]
fn groth16_bls12_381_end_to_end() {
    completeness_and_soundness::<Bls12_381, Groth16<Bls12_381>>();
}

#[test]
fn plonk_bn254_end_to_end() {
    completeness_and_soundness::<Bn254, Plonk<Bn254>>();
}

#[test]
fn plonk_bls12_381_end_to_end() {
    completeness_and_soundness::<Bls12_381, Plonk<Bls12_381>>();
}

fn key_binding<E: PipelineCurve, S: ProofSystem<E>>() {
    let mut rng = test_rng();
    let (def, pk, _) = keys::<E, S, _>(&CubicCircuit);
    let (_, _, other_vk) = keys::<E, S, _>(&Square);
    let witness = generate(&def, &CubicCircuit::assignment(3, 35)).unwrap();
    let proof = S::prove(&pk, &witness, &mut rng).unwrap();
    // a structural error is as good as a rejection here
    let accepted = S::verify(&other_vk, &witness.public(), &proof).unwrap_or(false);
    assert!(!accepted);
}

#[test]
fn groth16_keys_are_bound_to_their_circuit() {
    key_binding::<Bn254, Groth16<Bn254>>();
}

#[test]
fn plonk_keys_are_bound_to_their_circuit() {
    key_binding::<Bn254, Plonk<Bn254>>();
}

#[test]
fn unsatisfying_inputs_are_a_witness_error() {
    let def = CircuitDefinition::<Bn254Fr>::from_circuit(&CubicCircuit).unwrap();
    let err = generate(&def, &CubicCircuit::assignment(3, 36)).unwrap_err();
    assert!(matches!(err, PipelineError::Witness(_)));

    let mut rng = test_rng();
    let err = run::<Bn254, Groth16<Bn254>, _, _, _>(
        &CubicCircuit,
        &CubicCircuit::assignment(3, 36),
        &UnsafeSrsProvider,
        &mut rng,
    )
    .unwrap_err();
    assert_eq!(err.stage(), "witness");
}

fn multi_output<E: PipelineCurve, S: ProofSystem<E>>() {
    let mut rng = test_rng();
    // a=2, b=5, c=4: sum = 2 + 5 + 12 + 10 + 7 = 36, product = 40
    let mut assignment = Assignment::new();
    for (name, value) in [("a", 2u64), ("b", 5), ("c", 4), ("sum", 36), ("product", 40)] {
        assignment.set(name, E::ScalarField::from(value));
    }
    let run = run::<E, S, _, _, _>(&Polynomials, &assignment, &UnsafeSrsProvider, &mut rng).unwrap();

    let def = CircuitDefinition::from_circuit(&Polynomials).unwrap();
    let mut verifier_view = Assignment::new();
    verifier_view.set("sum", E::ScalarField::from(36u64));
    verifier_view.set("product", E::ScalarField::from(40u64));
    let public = public_witness(&def, &verifier_view).unwrap();
    assert_eq!(public, run.public);
    assert!(S::verify(&run.verifying_key, &public, &run.proof).unwrap());

    let swapped = PublicWitness(vec![E::ScalarField::from(40u64), E::ScalarField::from(36u64)]);
    assert!(!S::verify(&run.verifying_key, &swapped, &run.proof).unwrap());
}

#[test]
fn groth16_multiple_public_outputs() {
    multi_output::<Bn254, Groth16<Bn254>>();
}

#[test]
fn plonk_multiple_public_outputs() {
    multi_output::<Bls12_381, Plonk<Bls12_381>>();
}

fn concurrent_proving<E: PipelineCurve, S: ProofSystem<E>>() {
    let (def, pk, vk) = keys::<E, S, _>(&CubicCircuit);
    let results: Vec<bool> = (1u64..=6)
        .into_par_iter()
        .map(|x| {
            // independent RNG per call
            let mut rng = StdRng::seed_from_u64(x);
            let witness = generate(&def, &CubicCircuit::satisfying_assignment(x)).unwrap();
            let proof = S::prove(&pk, &witness, &mut rng).unwrap();
            S::verify(&vk, &witness.public(), &proof).unwrap()
        })
        .collect();
    assert!(results.into_iter().all(|ok| ok));
}

#[test]
fn groth16_concurrent_proving_with_shared_key() {
    concurrent_proving::<Bn254, Groth16<Bn254>>();
}

#[test]
fn plonk_concurrent_proving_with_shared_key() {
    concurrent_proving::<Bn254, Plonk<Bn254>>();
}

#[test]
fn plonk_setup_without_srs_fails() {
    let mut rng = test_rng();
    let def = CircuitDefinition::from_circuit(&CubicCircuit).unwrap();
    let cs = <Plonk<Bn254> as ProofSystem<Bn254>>::compile(&def).unwrap();
    let err = <Plonk<Bn254> as ProofSystem<Bn254>>::setup(&cs, None, &mut rng).unwrap_err();
    assert_eq!(err.stage(), "setup");
}
