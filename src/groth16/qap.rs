//! R1CS → QAP reduction

use ark_ff::{PrimeField, Zero};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};

use crate::errors::{PipelineError, Result};
use crate::r1cs::{R1CSInstance, SparseMatrix};
use crate::utils::poly::{divide_by_vanishing, interpolate};

/// Domain covering constraint rows plus input-consistency rows
pub(crate) fn domain<F: PrimeField>(r1cs: &R1CSInstance<F>) -> Option<Radix2EvaluationDomain<F>> {
    Radix2EvaluationDomain::new(r1cs.num_constraints + r1cs.num_instance_vars())
}

fn accumulate_columns<F: PrimeField>(matrix: &SparseMatrix<F>, lagrange: &[F], out: &mut [F]) {
    for (col, entries) in matrix.columns() {
        for (row, value) in entries {
            out[col] += lagrange[row] * value;
        }
    }
}

/// `(u_j(τ), v_j(τ), w_j(τ))` for every z column, and `t(τ)`
pub(crate) fn evaluate_at<F: PrimeField>(
    r1cs: &R1CSInstance<F>,
    domain: &Radix2EvaluationDomain<F>,
    tau: F,
) -> (Vec<F>, Vec<F>, Vec<F>, F) {
    let lagrange = domain.evaluate_all_lagrange_coefficients(tau);
    let mut u = vec![F::zero(); r1cs.num_vars];
    let mut v = vec![F::zero(); r1cs.num_vars];
    let mut w = vec![F::zero(); r1cs.num_vars];
    accumulate_columns(&r1cs.a, &lagrange, &mut u);
    accumulate_columns(&r1cs.b, &lagrange, &mut v);
    accumulate_columns(&r1cs.c, &lagrange, &mut w);
    for j in 0..r1cs.num_instance_vars() {
        u[j] += lagrange[r1cs.num_constraints + j];
    }
    (u, v, w, domain.evaluate_vanishing_polynomial(tau))
}

fn row_evaluations<F: PrimeField>(matrix: &SparseMatrix<F>, z: &[F], n: usize) -> Vec<F> {
    let mut evals = matrix.mul_vector(z);
    evals.resize(n, F::zero());
    evals
}

/// Coefficients of `h = (a·b - c) / t`, padded to `n - 1`.
///
/// Fails when the division leaves a remainder, i.e. when `z` does not
/// satisfy the constraints.
pub(crate) fn quotient<F: PrimeField>(
    r1cs: &R1CSInstance<F>,
    domain: &Radix2EvaluationDomain<F>,
    z: &[F],
) -> Result<Vec<F>> {
    let n = domain.size();
    let mut az = row_evaluations(&r1cs.a, z, n);
    for j in 0..r1cs.num_instance_vars() {
        az[r1cs.num_constraints + j] = z[j];
    }
    let bz = row_evaluations(&r1cs.b, z, n);
    let cz = row_evaluations(&r1cs.c, z, n);

    let a = interpolate(&az, domain);
    let b = interpolate(&bz, domain);
    let c = interpolate(&cz, domain);
    let numerator = &(&a * &b) - &c;
    let (h, remainder) = divide_by_vanishing(&numerator, domain);
    if !remainder.is_zero() {
        return Err(PipelineError::Proving(
            "witness does not satisfy the constraint system".into(),
        ));
    }
    let mut coeffs = h.coeffs;
    coeffs.resize(n - 1, F::zero());
    Ok(coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::{CircuitDefinition, CubicCircuit};
    use crate::field::Bn254Fr as Fr;
    use crate::r1cs::compile;
    use crate::witness::generate;
    use ark_std::{test_rng, UniformRand};

    fn cubic() -> (R1CSInstance<Fr>, Vec<Fr>) {
        let def = CircuitDefinition::from_circuit(&CubicCircuit).unwrap();
        let r1cs = compile(&def).unwrap();
        let w = generate(&def, &CubicCircuit::assignment(3, 35)).unwrap();
        let z = r1cs.build_z(&w).unwrap();
        (r1cs, z)
    }

    #[test]
    fn domain_covers_input_rows() {
        let (r1cs, _) = cubic();
        // 3 constraints + 2 instance rows
        assert_eq!(domain(&r1cs).unwrap().size(), 8);
    }

    #[test]
    fn qap_identity_holds_at_random_point() {
        let (r1cs, z) = cubic();
        let d = domain(&r1cs).unwrap();
        let h = quotient(&r1cs, &d, &z).unwrap();
        let tau = Fr::rand(&mut test_rng());
        let (u, v, w, t) = evaluate_at(&r1cs, &d, tau);
        let dot = |xs: &[Fr]| xs.iter().zip(z.iter()).map(|(a, b)| *a * b).sum::<Fr>();
        let h_tau = h.iter().rev().fold(Fr::zero(), |acc, c| acc * tau + c);
        assert_eq!(dot(&u) * dot(&v) - dot(&w), h_tau * t);
    }

    #[test]
    fn unsatisfied_assignment_leaves_remainder() {
        let (r1cs, mut z) = cubic();
        let d = domain(&r1cs).unwrap();
        z[1] += Fr::from(1u64);
        assert!(quotient(&r1cs, &d, &z).is_err());
    }
}
