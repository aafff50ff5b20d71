use ark_ec::pairing::Pairing;
use ark_ec::AffineRepr;
use ark_ff::{batch_inversion, FftField, Field, One, Zero};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};

use super::{transcript, Proof, VerifyingKey};
use crate::errors::{PipelineError, Result};
use crate::gates::coset_shifts;
use crate::srs::MAX_SRS_DEGREE;
use crate::utils::msm::msm;
use crate::witness::PublicWitness;

struct Challenges<F> {
    beta: F,
    gamma: F,
    alpha: F,
    zeta: F,
    v: F,
    u: F,
}

fn challenges<E: Pairing>(
    vk: &VerifyingKey<E>,
    public: &[E::ScalarField],
    proof: &Proof<E>,
) -> Result<Challenges<E::ScalarField>> {
    let mut transcript = transcript::start(vk, public)?;
    transcript.append_serializable(b"a", &proof.a)?;
    transcript.append_serializable(b"b", &proof.b)?;
    transcript.append_serializable(b"c", &proof.c)?;
    let beta = transcript.challenge_scalar(b"beta");
    let gamma = transcript.challenge_scalar(b"gamma");
    transcript.append_serializable(b"z", &proof.z)?;
    let alpha = transcript.challenge_scalar(b"alpha");
    transcript.append_serializable(b"t_lo", &proof.t_lo)?;
    transcript.append_serializable(b"t_mid", &proof.t_mid)?;
    transcript.append_serializable(b"t_hi", &proof.t_hi)?;
    let zeta = transcript.challenge_scalar(b"zeta");
    transcript.append_scalar(b"a_eval", &proof.a_eval);
    transcript.append_scalar(b"b_eval", &proof.b_eval);
    transcript.append_scalar(b"c_eval", &proof.c_eval);
    transcript.append_scalar(b"sigma_1_eval", &proof.sigma_1_eval);
    transcript.append_scalar(b"sigma_2_eval", &proof.sigma_2_eval);
    transcript.append_scalar(b"z_omega_eval", &proof.z_omega_eval);
    let v = transcript.challenge_scalar(b"v");
    transcript.append_serializable(b"w_zeta", &proof.w_zeta)?;
    transcript.append_serializable(b"w_zeta_omega", &proof.w_zeta_omega)?;
    let u = transcript.challenge_scalar(b"u");
    Ok(Challenges {
        beta,
        gamma,
        alpha,
        zeta,
        v,
        u,
    })
}

/// Batched KZG check of the linearised identity at ζ and the accumulator
/// opening at ζω
#[tracing::instrument(skip_all, name = "plonk::verify")]
pub fn verify<E: Pairing>(
    vk: &VerifyingKey<E>,
    public: &PublicWitness<E::ScalarField>,
    proof: &Proof<E>,
) -> Result<bool> {
    if public.len() as u64 != vk.num_public {
        return Err(PipelineError::VerificationInput(format!(
            "{} public inputs supplied, verifying key expects {}",
            public.len(),
            vk.num_public
        )));
    }
    if vk.domain_size == 0 || !vk.domain_size.is_power_of_two() || vk.domain_size > MAX_SRS_DEGREE as u64 {
        return Err(PipelineError::VerificationInput(format!(
            "verifying key has unsupported domain size {}",
            vk.domain_size
        )));
    }
    if vk.num_public > vk.domain_size {
        return Err(PipelineError::VerificationInput("verifying key is inconsistent".into()));
    }
    let n = vk.domain_size as usize;
    let domain = Radix2EvaluationDomain::<E::ScalarField>::new(n)
        .filter(|d| d.size() == n)
        .ok_or_else(|| {
            PipelineError::VerificationInput(format!("no radix-2 domain of size {}", n))
        })?;
    let omega = domain.element(1);

    let Challenges {
        beta,
        gamma,
        alpha,
        zeta,
        v,
        u,
    } = challenges(vk, public.values(), proof)?;
    let [_, k1, k2] = coset_shifts::<E::ScalarField>();

    let zeta_n = zeta.pow([n as u64]);
    let vanishing_at_zeta = zeta_n - E::ScalarField::one();
    let lagrange = leading_lagrange_at(&domain, zeta, public.len().max(1));
    let l1_zeta = lagrange[0];
    let pi_zeta = public
        .values()
        .iter()
        .zip(lagrange.iter())
        .fold(E::ScalarField::zero(), |acc, (x, l)| acc - *x * l);

    let (a, b, c) = (proof.a_eval, proof.b_eval, proof.c_eval);
    let (s1, s2, z_omega) = (proof.sigma_1_eval, proof.sigma_2_eval, proof.z_omega_eval);
    let alpha_sq = alpha.square();
    let sigma_coeff = alpha * (a + beta * s1 + gamma) * (b + beta * s2 + gamma) * z_omega;
    let r0 = pi_zeta - sigma_coeff * (c + gamma) - alpha_sq * l1_zeta;
    let id_coeff = alpha
        * (a + beta * zeta + gamma)
        * (b + beta * k1 * zeta + gamma)
        * (c + beta * k2 * zeta + gamma)
        + alpha_sq * l1_zeta;

    let v2 = v * v;
    let v3 = v2 * v;
    let v4 = v3 * v;
    let v5 = v4 * v;
    let batched_eval = -r0 + v * a + v2 * b + v3 * c + v4 * s1 + v5 * s2 + u * z_omega;

    // ζ·W_ζ + uζω·W_ζω + [F] - E·[1]₁
    let bases = [
        vk.q_m,
        vk.q_l,
        vk.q_r,
        vk.q_o,
        vk.q_c,
        proof.z,
        vk.sigma_3,
        proof.t_lo,
        proof.t_mid,
        proof.t_hi,
        proof.a,
        proof.b,
        proof.c,
        vk.sigma_1,
        vk.sigma_2,
        proof.w_zeta,
        proof.w_zeta_omega,
        E::G1Affine::generator(),
    ];
    let scalars = [
        a * b,
        a,
        b,
        c,
        E::ScalarField::one(),
        id_coeff + u,
        -(sigma_coeff * beta),
        -vanishing_at_zeta,
        -(vanishing_at_zeta * zeta_n),
        -(vanishing_at_zeta * zeta_n.square()),
        v,
        v2,
        v3,
        v4,
        v5,
        zeta,
        u * zeta * omega,
        -batched_eval,
    ];
    let rhs = msm::<E::G1>(&bases, &scalars);
    let lhs = proof.w_zeta_omega * u + proof.w_zeta;

    let check = E::multi_pairing([lhs, -rhs], [vk.tau_g2, vk.g2]);
    Ok(check.is_zero())
}

/// `L_i(ζ) = ω^i (ζ^n - 1) / (n (ζ - ω^i))` for `i < count`
fn leading_lagrange_at<F: FftField>(
    domain: &Radix2EvaluationDomain<F>,
    zeta: F,
    count: usize,
) -> Vec<F> {
    let points: Vec<F> = domain.elements().take(count).collect();
    let vanishing = domain.evaluate_vanishing_polynomial(zeta);
    if vanishing.is_zero() {
        return points.iter().map(|w| if *w == zeta { F::one() } else { F::zero() }).collect();
    }
    let mut denominators: Vec<F> = points.iter().map(|w| zeta - w).collect();
    batch_inversion(&mut denominators);
    let scale = vanishing * domain.size_inv();
    points
        .iter()
        .zip(denominators)
        .map(|(w, inv)| *w * scale * inv)
        .collect()
}
