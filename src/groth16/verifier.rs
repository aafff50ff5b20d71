use ark_ec::pairing::Pairing;
use ark_ec::AffineRepr;

use super::{PreparedVerifyingKey, Proof, VerifyingKey};
use crate::errors::{PipelineError, Result};
use crate::utils::msm::msm;
use crate::witness::PublicWitness;

pub fn prepare_verifying_key<E: Pairing>(vk: &VerifyingKey<E>) -> PreparedVerifyingKey<E> {
    PreparedVerifyingKey {
        vk: vk.clone(),
        alpha_beta: E::pairing(vk.alpha_g1, vk.beta_g2),
    }
}

pub fn verify<E: Pairing>(
    vk: &VerifyingKey<E>,
    public: &PublicWitness<E::ScalarField>,
    proof: &Proof<E>,
) -> Result<bool> {
    verify_prepared(&prepare_verifying_key(vk), public.values(), proof)
}

/// `e(A, B) = e(α, β) · e(Σ x_j·IC_j, γ) · e(C, δ)`
#[tracing::instrument(skip_all, name = "groth16::verify")]
pub fn verify_prepared<E: Pairing>(
    pvk: &PreparedVerifyingKey<E>,
    public: &[E::ScalarField],
    proof: &Proof<E>,
) -> Result<bool> {
    let vk = &pvk.vk;
    if public.len() != vk.num_public() || vk.gamma_abc_g1.is_empty() {
        return Err(PipelineError::VerificationInput(format!(
            "{} public inputs supplied, verifying key expects {}",
            public.len(),
            vk.num_public()
        )));
    }

    let acc = msm::<E::G1>(&vk.gamma_abc_g1[1..], public) + vk.gamma_abc_g1[0];
    let lhs = E::multi_pairing(
        [proof.a.into_group(), -acc, -proof.c.into_group()],
        [proof.b, vk.gamma_g2, vk.delta_g2],
    );
    Ok(lhs == pvk.alpha_beta)
}
