use ark_ec::pairing::Pairing;
use ark_ec::CurveGroup;
use ark_ff::UniformRand;
use ark_std::rand::RngCore;

use super::{qap, Proof, ProvingKey};
use crate::errors::{PipelineError, Result};
use crate::utils::msm::msm;
use crate::witness::Witness;

/// Proof for a full witness; `r` and `s` are fresh per call
#[tracing::instrument(skip_all, name = "groth16::prove")]
pub fn prove<E: Pairing, R: RngCore>(
    pk: &ProvingKey<E>,
    witness: &Witness<E::ScalarField>,
    rng: &mut R,
) -> Result<Proof<E>> {
    let r1cs = &pk.r1cs;
    let z = r1cs.build_z(witness)?;
    if !r1cs.is_satisfied(&z)? {
        return Err(PipelineError::Proving(
            "witness does not satisfy the constraint system".into(),
        ));
    }
    if pk.a_query.len() != z.len() || pk.l_query.len() != r1cs.num_witness_vars() {
        return Err(PipelineError::Proving("proving key does not match the constraint system".into()));
    }

    let domain = qap::domain(r1cs)
        .ok_or_else(|| PipelineError::Proving("no evaluation domain for the constraint system".into()))?;
    let h = qap::quotient(r1cs, &domain, &z)?;
    if h.len() != pk.h_query.len() {
        return Err(PipelineError::Proving("proving key does not match the constraint system".into()));
    }

    let r = E::ScalarField::rand(rng);
    let s = E::ScalarField::rand(rng);

    let num_instance = r1cs.num_instance_vars();
    let a = msm::<E::G1>(&pk.a_query, &z) + pk.vk.alpha_g1 + pk.delta_g1 * r;
    let b_g1 = msm::<E::G1>(&pk.b_g1_query, &z) + pk.beta_g1 + pk.delta_g1 * s;
    let b_g2 = msm::<E::G2>(&pk.b_g2_query, &z) + pk.vk.beta_g2 + pk.vk.delta_g2 * s;
    let c = msm::<E::G1>(&pk.l_query, &z[num_instance..])
        + msm::<E::G1>(&pk.h_query, &h)
        + a * s
        + b_g1 * r
        - pk.delta_g1 * (r * s);

    Ok(Proof {
        a: a.into_affine(),
        b: b_g2.into_affine(),
        c: c.into_affine(),
    })
}
