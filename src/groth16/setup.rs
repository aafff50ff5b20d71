use ark_ec::pairing::Pairing;
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ff::{Field, UniformRand, Zero};
use ark_poly::EvaluationDomain;
use ark_std::rand::RngCore;

use super::{qap, ProvingKey, VerifyingKey};
use crate::errors::{PipelineError, Result};
use crate::r1cs::R1CSInstance;
use crate::utils::msm::fixed_base_mul;

fn nonzero<F: Field, R: RngCore>(rng: &mut R) -> F {
    loop {
        let x = F::rand(rng);
        if !x.is_zero() {
            return x;
        }
    }
}

/// Circuit-specific key generation
///
/// # Arguments
/// - `r1cs`: compiled constraint system; the proving key keeps a copy
/// - `rng`: source of the toxic waste τ, α, β, γ, δ
#[tracing::instrument(skip_all, name = "groth16::setup")]
pub fn setup<E: Pairing, R: RngCore>(
    r1cs: &R1CSInstance<E::ScalarField>,
    rng: &mut R,
) -> Result<(ProvingKey<E>, VerifyingKey<E>)> {
    let domain = qap::domain(r1cs).ok_or_else(|| {
        PipelineError::Setup(format!(
            "no evaluation domain for {} constraints",
            r1cs.num_constraints
        ))
    })?;

    let tau = loop {
        let t = E::ScalarField::rand(rng);
        if !domain.evaluate_vanishing_polynomial(t).is_zero() {
            break t;
        }
    };
    let alpha: E::ScalarField = nonzero(rng);
    let beta: E::ScalarField = nonzero(rng);
    let gamma: E::ScalarField = nonzero(rng);
    let delta: E::ScalarField = nonzero(rng);
    let gamma_inv = gamma
        .inverse()
        .ok_or_else(|| PipelineError::Setup("γ is not invertible".into()))?;
    let delta_inv = delta
        .inverse()
        .ok_or_else(|| PipelineError::Setup("δ is not invertible".into()))?;

    let (u, v, w, t_tau) = qap::evaluate_at(r1cs, &domain, tau);
    let num_instance = r1cs.num_instance_vars();
    let combined: Vec<E::ScalarField> = (0..r1cs.num_vars)
        .map(|j| beta * u[j] + alpha * v[j] + w[j])
        .collect();
    let gamma_abc: Vec<E::ScalarField> =
        combined[..num_instance].iter().map(|x| *x * gamma_inv).collect();
    let l: Vec<E::ScalarField> = combined[num_instance..].iter().map(|x| *x * delta_inv).collect();

    let mut h_scalars = Vec::with_capacity(domain.size() - 1);
    let mut power = t_tau * delta_inv;
    for _ in 0..domain.size() - 1 {
        h_scalars.push(power);
        power *= tau;
    }

    let g1 = E::G1::generator();
    let g2 = E::G2::generator();

    let vk = VerifyingKey {
        alpha_g1: (g1 * alpha).into_affine(),
        beta_g2: (g2 * beta).into_affine(),
        gamma_g2: (g2 * gamma).into_affine(),
        delta_g2: (g2 * delta).into_affine(),
        gamma_abc_g1: fixed_base_mul(g1, &gamma_abc),
    };
    let pk = ProvingKey {
        vk: vk.clone(),
        beta_g1: (g1 * beta).into_affine(),
        delta_g1: (g1 * delta).into_affine(),
        a_query: fixed_base_mul(g1, &u),
        b_g1_query: fixed_base_mul(g1, &v),
        b_g2_query: fixed_base_mul(g2, &v),
        h_query: fixed_base_mul(g1, &h_scalars),
        l_query: fixed_base_mul(g1, &l),
        r1cs: r1cs.clone(),
    };

    tracing::debug!(
        domain_size = domain.size(),
        num_public = r1cs.num_public,
        "generated Groth16 keys"
    );
    Ok((pk, vk))
}
