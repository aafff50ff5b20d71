use ark_ec::pairing::Pairing;
use ark_ff::{batch_inversion, FftField, Field, One, Zero};
use ark_poly::univariate::DensePolynomial;
use ark_poly::{DenseUVPolynomial, EvaluationDomain, Polynomial, Radix2EvaluationDomain};
use ark_std::rand::RngCore;

use super::{transcript, Proof, ProvingKey};
use crate::errors::{PipelineError, Result};
use crate::gates::coset_shifts;
use crate::utils::poly::{
    add_vanishing_multiple, divide_by_linear, divide_by_vanishing, interpolate, scale,
    shift_argument,
};
use crate::witness::Witness;

type Poly<F> = DensePolynomial<F>;

fn constant<F: Field>(c: F) -> Poly<F> {
    DensePolynomial::from_coefficients_vec(vec![c])
}

fn commit<E: Pairing>(pk: &ProvingKey<E>, p: &Poly<E::ScalarField>) -> Result<E::G1Affine> {
    pk.srs
        .commit(&p.coeffs)
        .map_err(|e| PipelineError::Proving(e.to_string()))
}

/// Interpolation of `evals` plus `Z_H(X) · (b_0 + b_1 X + ...)` with fresh `b_i`
fn blinded<F: FftField, R: RngCore>(
    evals: &[F],
    num_blinders: usize,
    domain: &Radix2EvaluationDomain<F>,
    rng: &mut R,
) -> Poly<F> {
    let blinders: Vec<F> = (0..num_blinders).map(|_| F::rand(rng)).collect();
    add_vanishing_multiple(&interpolate(evals, domain), &blinders, domain)
}

/// Grand-product accumulator `z(ω^i)` for the copy constraints
fn accumulator<F: ark_ff::PrimeField>(
    columns: &[Vec<F>; 3],
    sigma_evals: &[Vec<F>; 3],
    domain: &Radix2EvaluationDomain<F>,
    beta: F,
    gamma: F,
) -> Result<Vec<F>> {
    let n = domain.size();
    let shifts = coset_shifts::<F>();
    let mut numerators = Vec::with_capacity(n);
    let mut denominators = Vec::with_capacity(n);
    for (i, omega_i) in domain.elements().enumerate() {
        let mut num = F::one();
        let mut den = F::one();
        for col in 0..3 {
            let w = columns[col][i];
            num *= w + beta * shifts[col] * omega_i + gamma;
            den *= w + beta * sigma_evals[col][i] + gamma;
        }
        numerators.push(num);
        denominators.push(den);
    }
    if denominators.iter().any(|d| d.is_zero()) {
        return Err(PipelineError::Proving("degenerate permutation challenge".into()));
    }
    batch_inversion(&mut denominators);

    let mut z = Vec::with_capacity(n);
    let mut acc = F::one();
    for i in 0..n {
        z.push(acc);
        acc *= numerators[i] * denominators[i];
    }
    if !acc.is_one() {
        return Err(PipelineError::Proving("copy constraints are not satisfied".into()));
    }
    Ok(z)
}

fn coefficients<F: Field>(coeffs: &[F], start: usize, end: usize, width: usize) -> Vec<F> {
    let mut out = coeffs.get(start..end.min(coeffs.len())).unwrap_or(&[]).to_vec();
    out.resize(width.max(out.len()), F::zero());
    out
}

/// Split `t` into `t_lo + X^n t_mid + X^{2n} t_hi`, then blind the pieces as
/// `t_lo + b_1 X^n`, `t_mid - b_1 + b_2 X^n` and `t_hi - b_2`
fn split_quotient<F: FftField, R: RngCore>(t: &Poly<F>, n: usize, rng: &mut R) -> [Poly<F>; 3] {
    let (b1, b2) = (F::rand(rng), F::rand(rng));
    let mut lo = coefficients(&t.coeffs, 0, n, n + 1);
    let mut mid = coefficients(&t.coeffs, n, 2 * n, n + 1);
    let mut hi = coefficients(&t.coeffs, 2 * n, t.coeffs.len(), 1);
    lo[n] += b1;
    mid[0] -= b1;
    mid[n] += b2;
    hi[0] -= b2;
    [lo, mid, hi].map(DensePolynomial::from_coefficients_vec)
}

#[tracing::instrument(skip_all, name = "plonk::prove")]
pub fn prove<E: Pairing, R: RngCore>(
    pk: &ProvingKey<E>,
    witness: &Witness<E::ScalarField>,
    rng: &mut R,
) -> Result<Proof<E>> {
    let gates = &pk.gates;
    let n = gates.domain_size;
    let domain = Radix2EvaluationDomain::<E::ScalarField>::new(n)
        .filter(|d| d.size() == n)
        .ok_or_else(|| PipelineError::Proving(format!("no radix-2 domain of size {}", n)))?;
    let omega = domain.element(1);

    let values = gates.wire_values(witness)?;
    let public = witness.public();
    if !gates.is_satisfied(&values, public.values()) {
        return Err(PipelineError::Proving("witness does not satisfy the gate system".into()));
    }
    let columns = gates.wire_columns(&values);
    let mut transcript = transcript::start(&pk.vk, public.values())?;

    // Round 1: wires
    let a_poly = blinded(&columns[0], 2, &domain, rng);
    let b_poly = blinded(&columns[1], 2, &domain, rng);
    let c_poly = blinded(&columns[2], 2, &domain, rng);
    let a = commit(pk, &a_poly)?;
    let b = commit(pk, &b_poly)?;
    let c = commit(pk, &c_poly)?;
    transcript.append_serializable(b"a", &a)?;
    transcript.append_serializable(b"b", &b)?;
    transcript.append_serializable(b"c", &c)?;
    let beta: E::ScalarField = transcript.challenge_scalar(b"beta");
    let gamma: E::ScalarField = transcript.challenge_scalar(b"gamma");

    // Round 2: permutation accumulator
    let z_evals = accumulator(&columns, &pk.sigma_evals, &domain, beta, gamma)?;
    let z_poly = blinded(&z_evals, 3, &domain, rng);
    let z = commit(pk, &z_poly)?;
    transcript.append_serializable(b"z", &z)?;
    let alpha: E::ScalarField = transcript.challenge_scalar(b"alpha");

    // Round 3: quotient
    let [_, k1, k2] = coset_shifts::<E::ScalarField>();
    let pi_poly = interpolate(&gates.public_input_column(public.values()), &domain);
    let mut l1_evals = vec![E::ScalarField::zero(); n];
    l1_evals[0] = E::ScalarField::one();
    let l1_poly = interpolate(&l1_evals, &domain);

    let mut gate = &(&a_poly * &b_poly) * &pk.q_m;
    gate += &(&a_poly * &pk.q_l);
    gate += &(&b_poly * &pk.q_r);
    gate += &(&c_poly * &pk.q_o);
    gate += &pk.q_c;
    gate += &pi_poly;

    let id_factor = |w: &Poly<E::ScalarField>, k: E::ScalarField| {
        w + &DensePolynomial::from_coefficients_vec(vec![gamma, beta * k])
    };
    let sigma_factor = |w: &Poly<E::ScalarField>, s: &Poly<E::ScalarField>| {
        &(w + &scale(s, beta)) + &constant(gamma)
    };
    let perm_id = &(&(&id_factor(&a_poly, E::ScalarField::one()) * &id_factor(&b_poly, k1))
        * &id_factor(&c_poly, k2))
        * &z_poly;
    let perm_sigma = &(&(&sigma_factor(&a_poly, &pk.sigma[0]) * &sigma_factor(&b_poly, &pk.sigma[1]))
        * &sigma_factor(&c_poly, &pk.sigma[2]))
        * &shift_argument(&z_poly, omega);
    let boundary = &(&z_poly - &constant(E::ScalarField::one())) * &l1_poly;

    let mut numerator = gate;
    numerator += &scale(&(&perm_id - &perm_sigma), alpha);
    numerator += &scale(&boundary, alpha.square());
    let (t_poly, remainder) = divide_by_vanishing(&numerator, &domain);
    if !remainder.is_zero() {
        return Err(PipelineError::Proving("quotient division left a remainder".into()));
    }
    let [t_lo_poly, t_mid_poly, t_hi_poly] = split_quotient(&t_poly, n, rng);
    let t_lo = commit(pk, &t_lo_poly)?;
    let t_mid = commit(pk, &t_mid_poly)?;
    let t_hi = commit(pk, &t_hi_poly)?;
    transcript.append_serializable(b"t_lo", &t_lo)?;
    transcript.append_serializable(b"t_mid", &t_mid)?;
    transcript.append_serializable(b"t_hi", &t_hi)?;
    let zeta: E::ScalarField = transcript.challenge_scalar(b"zeta");

    // Round 4: evaluations
    let a_eval = a_poly.evaluate(&zeta);
    let b_eval = b_poly.evaluate(&zeta);
    let c_eval = c_poly.evaluate(&zeta);
    let sigma_1_eval = pk.sigma[0].evaluate(&zeta);
    let sigma_2_eval = pk.sigma[1].evaluate(&zeta);
    let z_omega_eval = z_poly.evaluate(&(zeta * omega));
    transcript.append_scalar(b"a_eval", &a_eval);
    transcript.append_scalar(b"b_eval", &b_eval);
    transcript.append_scalar(b"c_eval", &c_eval);
    transcript.append_scalar(b"sigma_1_eval", &sigma_1_eval);
    transcript.append_scalar(b"sigma_2_eval", &sigma_2_eval);
    transcript.append_scalar(b"z_omega_eval", &z_omega_eval);
    let v: E::ScalarField = transcript.challenge_scalar(b"v");

    // Round 5: linearisation and openings
    let zeta_n = zeta.pow([n as u64]);
    let vanishing_at_zeta = zeta_n - E::ScalarField::one();
    let l1_zeta = l1_poly.evaluate(&zeta);
    let pi_zeta = pi_poly.evaluate(&zeta);
    let id_coeff = alpha
        * (a_eval + beta * zeta + gamma)
        * (b_eval + beta * k1 * zeta + gamma)
        * (c_eval + beta * k2 * zeta + gamma);
    let sigma_coeff =
        alpha * (a_eval + beta * sigma_1_eval + gamma) * (b_eval + beta * sigma_2_eval + gamma) * z_omega_eval;

    let mut r_poly = scale(&pk.q_m, a_eval * b_eval);
    r_poly += &scale(&pk.q_l, a_eval);
    r_poly += &scale(&pk.q_r, b_eval);
    r_poly += &scale(&pk.q_o, c_eval);
    r_poly += &pk.q_c;
    r_poly += &scale(&z_poly, id_coeff + alpha.square() * l1_zeta);
    r_poly -= &scale(&pk.sigma[2], sigma_coeff * beta);
    let mut t_combined = t_lo_poly;
    t_combined += &scale(&t_mid_poly, zeta_n);
    t_combined += &scale(&t_hi_poly, zeta_n.square());
    r_poly -= &scale(&t_combined, vanishing_at_zeta);
    r_poly += &constant(pi_zeta - sigma_coeff * (c_eval + gamma) - alpha.square() * l1_zeta);
    debug_assert!(r_poly.evaluate(&zeta).is_zero());

    let mut opening = r_poly;
    let mut v_power = v;
    for p in [&a_poly, &b_poly, &c_poly, &pk.sigma[0], &pk.sigma[1]] {
        opening += &scale(p, v_power);
        v_power *= v;
    }
    let w_zeta = commit(pk, &divide_by_linear(&opening, zeta))?;
    let w_zeta_omega = commit(pk, &divide_by_linear(&z_poly, zeta * omega))?;

    tracing::debug!(domain_size = n, "PLONK proof generated");
    Ok(Proof {
        a,
        b,
        c,
        z,
        t_lo,
        t_mid,
        t_hi,
        w_zeta,
        w_zeta_omega,
        a_eval,
        b_eval,
        c_eval,
        sigma_1_eval,
        sigma_2_eval,
        z_omega_eval,
    })
}
