use ark_ec::pairing::Pairing;
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use ark_std::rand::RngCore;

use super::{ProvingKey, VerifyingKey};
use crate::errors::{PipelineError, Result};
use crate::gates::{sigma_evaluations, GateSystem};
use crate::srs::Srs;
use crate::utils::poly::interpolate;

/// Monomial SRS degree needed for a domain of size `n`: the high quotient
/// piece reaches degree `n + 5`
pub fn required_degree(domain_size: usize) -> usize {
    domain_size + 5
}

/// Preprocess selectors and permutation against a universal SRS
#[tracing::instrument(skip_all, name = "plonk::setup")]
pub fn setup<E: Pairing, R: RngCore>(
    gates: &GateSystem<E::ScalarField>,
    srs: Option<&Srs<E>>,
    rng: &mut R,
) -> Result<(ProvingKey<E>, VerifyingKey<E>)> {
    let srs = srs.ok_or_else(|| PipelineError::Setup("PLONK setup requires an SRS".into()))?;
    let n = gates.domain_size;
    if srs.lagrange_size() != n {
        return Err(PipelineError::Setup(format!(
            "SRS Lagrange basis has size {}, circuit domain is {}",
            srs.lagrange_size(),
            n
        )));
    }
    if srs.max_degree() < required_degree(n) {
        return Err(PipelineError::Setup(format!(
            "SRS degree {} is below the required {}",
            srs.max_degree(),
            required_degree(n)
        )));
    }
    if !srs.verify_structure(rng) {
        return Err(PipelineError::Setup("SRS failed the structure check".into()));
    }
    let domain = Radix2EvaluationDomain::<E::ScalarField>::new(n)
        .filter(|d| d.size() == n)
        .ok_or_else(|| PipelineError::Setup(format!("no radix-2 domain of size {}", n)))?;

    let [q_m, q_l, q_r, q_o, q_c] = gates.selector_columns();
    let sigma_evals = sigma_evaluations(&gates.permutation, &domain);

    let vk = VerifyingKey {
        domain_size: n as u64,
        num_public: gates.num_public as u64,
        q_m: srs.commit_lagrange(&q_m)?,
        q_l: srs.commit_lagrange(&q_l)?,
        q_r: srs.commit_lagrange(&q_r)?,
        q_o: srs.commit_lagrange(&q_o)?,
        q_c: srs.commit_lagrange(&q_c)?,
        sigma_1: srs.commit_lagrange(&sigma_evals[0])?,
        sigma_2: srs.commit_lagrange(&sigma_evals[1])?,
        sigma_3: srs.commit_lagrange(&sigma_evals[2])?,
        g2: srs.g2,
        tau_g2: srs.tau_g2,
    };

    let pk = ProvingKey {
        vk: vk.clone(),
        gates: gates.clone(),
        srs: srs.clone(),
        q_m: interpolate(&q_m, &domain),
        q_l: interpolate(&q_l, &domain),
        q_r: interpolate(&q_r, &domain),
        q_o: interpolate(&q_o, &domain),
        q_c: interpolate(&q_c, &domain),
        sigma: [
            interpolate(&sigma_evals[0], &domain),
            interpolate(&sigma_evals[1], &domain),
            interpolate(&sigma_evals[2], &domain),
        ],
        sigma_evals,
    };

    tracing::debug!(domain_size = n, num_public = gates.num_public, "generated PLONK keys");
    Ok((pk, vk))
}
