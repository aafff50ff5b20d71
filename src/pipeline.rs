//! Sequential stage driver
//!
//! compile → SRS (gate-based backend only) → setup → witness → prove →
//! in-process verify → artifact bundle. Every stage fails fast; nothing is
//! written unless the proof verified.

use ark_std::rand::RngCore;
use std::path::Path;

use crate::artifacts::{ArtifactBundle, Header};
use crate::circuit::{Circuit, CircuitDefinition, CubicCircuit};
use crate::config::{Backend, Curve, PipelineConfig};
use crate::errors::{PipelineError, Result};
use crate::field::{Bls12_381, Bn254, PipelineCurve};
use crate::srs::{SrsProvider, UnsafeSrsProvider};
use crate::traits::proof_system::{GROTH16_ID, PLONK_ID};
use crate::traits::{Groth16, Plonk, ProofSystem};
use crate::witness::{generate, Assignment, PublicWitness};

/// Everything a proving run produces
#[derive(Clone, Debug)]
pub struct ProofRun<E: PipelineCurve, S: ProofSystem<E>> {
    pub proving_key: S::ProvingKey,
    pub verifying_key: S::VerifyingKey,
    pub proof: S::Proof,
    pub public: PublicWitness<E::ScalarField>,
    pub bundle: ArtifactBundle,
}

/// Run every stage for one circuit and one assignment
///
/// # Arguments
/// - `circuit`: circuit to compile
/// - `assignment`: named input values, private ones included
/// - `srs_provider`: consulted only when the backend needs an SRS
/// - `rng`: the single randomness source for SRS, setup and proving
#[tracing::instrument(skip_all, name = "pipeline::run", fields(backend = S::NAME, curve = E::NAME))]
pub fn run<E, S, C, P, R>(
    circuit: &C,
    assignment: &Assignment<E::ScalarField>,
    srs_provider: &P,
    rng: &mut R,
) -> Result<ProofRun<E, S>>
where
    E: PipelineCurve,
    S: ProofSystem<E>,
    C: Circuit<E::ScalarField>,
    P: SrsProvider<E>,
    R: RngCore,
{
    let definition = CircuitDefinition::from_circuit(circuit)?;
    let cs = S::compile(&definition)?;
    tracing::info!(
        constraints = definition.num_constraints(),
        public = definition.num_public(),
        "circuit compiled"
    );

    let srs = match S::srs_size(&cs) {
        Some((max_degree, domain_size)) => {
            let srs = srs_provider.provide(max_degree, domain_size, rng)?;
            tracing::info!(max_degree, domain_size, "SRS ready");
            Some(srs)
        }
        None => None,
    };

    let (proving_key, verifying_key) = S::setup(&cs, srs.as_ref(), rng)?;
    tracing::info!("setup complete");

    let witness = generate(&definition, assignment)?;
    let public = witness.public();

    let proof = S::prove(&proving_key, &witness, rng)?;
    tracing::info!("proof generated");

    if !S::verify(&verifying_key, &public, &proof)? {
        return Err(PipelineError::Proving(
            "proof was rejected by in-process verification".into(),
        ));
    }

    let bundle = ArtifactBundle::new::<E, S>(&verifying_key, &proof, &public)?;
    tracing::info!(
        proof_bytes = bundle.proof_bytes.len(),
        vk_bytes = bundle.vk_bytes.len(),
        "proof verified"
    );
    Ok(ProofRun {
        proving_key,
        verifying_key,
        proof,
        public,
        bundle,
    })
}

/// Decode a bundle for one backend and curve and verify it
pub fn verify_bundle<E: PipelineCurve, S: ProofSystem<E>>(bundle: &ArtifactBundle) -> Result<bool> {
    let (vk, proof, public) = bundle
        .decode::<E, S>()
        .map_err(|e| PipelineError::VerificationInput(e.to_string()))?;
    S::verify(&vk, &public, &proof)
}

fn prove_cubic<E: PipelineCurve, S: ProofSystem<E>>(config: &PipelineConfig) -> Result<ArtifactBundle> {
    let mut rng = config.rng();
    let assignment = CubicCircuit::satisfying_assignment::<E::ScalarField>(config.x);
    let run = run::<E, S, _, _, _>(&CubicCircuit, &assignment, &UnsafeSrsProvider, &mut rng)?;
    Ok(run.bundle)
}

/// Prove the cubic circuit with the configured backend and curve, then
/// write the bundle to the output directory
pub fn prove_to_dir(config: &PipelineConfig) -> Result<ArtifactBundle> {
    let bundle = match (config.backend, config.curve) {
        (Backend::Groth16, Curve::Bn254) => prove_cubic::<Bn254, Groth16<Bn254>>(config)?,
        (Backend::Groth16, Curve::Bls12_381) => prove_cubic::<Bls12_381, Groth16<Bls12_381>>(config)?,
        (Backend::Plonk, Curve::Bn254) => prove_cubic::<Bn254, Plonk<Bn254>>(config)?,
        (Backend::Plonk, Curve::Bls12_381) => prove_cubic::<Bls12_381, Plonk<Bls12_381>>(config)?,
    };
    bundle.write_to_dir(&config.output_dir)?;
    Ok(bundle)
}

/// Load a bundle from `dir` and verify it with the backend and curve its
/// headers name
pub fn verify_dir(dir: &Path) -> Result<bool> {
    verify_dir_as(dir, None, None)
}

/// Like [`verify_dir`], but refuses a bundle whose headers name a
/// different backend or curve than the ones given
pub fn verify_dir_as(
    dir: &Path,
    expected_backend: Option<Backend>,
    expected_curve: Option<Curve>,
) -> Result<bool> {
    let bundle = ArtifactBundle::read_from_dir(dir)?;
    let Header { backend, curve, .. } = bundle.header()?;
    if expected_backend.is_some_and(|b| b.id() != backend)
        || expected_curve.is_some_and(|c| c.id() != curve)
    {
        return Err(PipelineError::VerificationInput(format!(
            "bundle was produced with backend/curve tags {}/{}",
            backend, curve
        )));
    }
    let accepted = match (backend, curve) {
        (GROTH16_ID, c) if c == Bn254::CURVE_ID => verify_bundle::<Bn254, Groth16<Bn254>>(&bundle)?,
        (GROTH16_ID, c) if c == Bls12_381::CURVE_ID => {
            verify_bundle::<Bls12_381, Groth16<Bls12_381>>(&bundle)?
        }
        (PLONK_ID, c) if c == Bn254::CURVE_ID => verify_bundle::<Bn254, Plonk<Bn254>>(&bundle)?,
        (PLONK_ID, c) if c == Bls12_381::CURVE_ID => verify_bundle::<Bls12_381, Plonk<Bls12_381>>(&bundle)?,
        _ => {
            return Err(PipelineError::VerificationInput(format!(
                "unsupported backend/curve tags {}/{}",
                backend, curve
            )))
        }
    };
    tracing::info!(accepted, vk_digest = %bundle.vk_digest(), "bundle verified");
    Ok(accepted)
}
