//! Univariate polynomial helpers for the KZG-based backend

use ark_ff::FftField;
use ark_poly::univariate::DensePolynomial;
use ark_poly::{DenseUVPolynomial, EvaluationDomain, Radix2EvaluationDomain};

/// p(X) / (X - z) by synthetic division; the remainder p(z) is dropped
pub fn divide_by_linear<F: FftField>(p: &DensePolynomial<F>, z: F) -> DensePolynomial<F> {
    if p.coeffs.len() < 2 {
        return DensePolynomial::from_coefficients_vec(vec![]);
    }
    let mut quotient = vec![F::zero(); p.coeffs.len() - 1];
    let mut carry = F::zero();
    for i in (1..p.coeffs.len()).rev() {
        carry = p.coeffs[i] + carry * z;
        quotient[i - 1] = carry;
    }
    DensePolynomial::from_coefficients_vec(quotient)
}

/// p(X) / (X^n - 1), returning (quotient, remainder)
pub fn divide_by_vanishing<F: FftField>(
    p: &DensePolynomial<F>,
    domain: &Radix2EvaluationDomain<F>,
) -> (DensePolynomial<F>, DensePolynomial<F>) {
    let n = domain.size();
    let mut rem = p.coeffs.clone();
    if rem.len() <= n {
        return (DensePolynomial::from_coefficients_vec(vec![]), p.clone());
    }
    let mut quotient = vec![F::zero(); rem.len() - n];
    for i in (n..rem.len()).rev() {
        let lead = rem[i];
        quotient[i - n] += lead;
        rem[i - n] += lead;
        rem[i] = F::zero();
    }
    rem.truncate(n);
    (
        DensePolynomial::from_coefficients_vec(quotient),
        DensePolynomial::from_coefficients_vec(rem),
    )
}

/// p(X) · s
pub fn scale<F: FftField>(p: &DensePolynomial<F>, s: F) -> DensePolynomial<F> {
    DensePolynomial::from_coefficients_vec(p.coeffs.iter().map(|c| *c * s).collect())
}

/// p(s·X), i.e. coefficient i multiplied by s^i
pub fn shift_argument<F: FftField>(p: &DensePolynomial<F>, s: F) -> DensePolynomial<F> {
    let mut power = F::one();
    let coeffs = p
        .coeffs
        .iter()
        .map(|c| {
            let out = *c * power;
            power *= s;
            out
        })
        .collect();
    DensePolynomial::from_coefficients_vec(coeffs)
}

/// Polynomial taking `evals[i]` at ω^i
pub fn interpolate<F: FftField>(
    evals: &[F],
    domain: &Radix2EvaluationDomain<F>,
) -> DensePolynomial<F> {
    DensePolynomial::from_coefficients_vec(domain.ifft(evals))
}

/// Z_H(X) · (coeffs[0] + coeffs[1] X + ...) added to `p`
pub fn add_vanishing_multiple<F: FftField>(
    p: &DensePolynomial<F>,
    coeffs: &[F],
    domain: &Radix2EvaluationDomain<F>,
) -> DensePolynomial<F> {
    let n = domain.size();
    let mut out = p.coeffs.clone();
    out.resize(out.len().max(n + coeffs.len()), F::zero());
    for (i, c) in coeffs.iter().enumerate() {
        out[i] -= c;
        out[n + i] += c;
    }
    DensePolynomial::from_coefficients_vec(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_poly::Polynomial;
    use ark_std::{test_rng, UniformRand};

    fn random_poly(degree: usize) -> DensePolynomial<Fr> {
        let mut rng = test_rng();
        DensePolynomial::from_coefficients_vec((0..=degree).map(|_| Fr::rand(&mut rng)).collect())
    }

    #[test]
    fn linear_division_is_exact_for_roots() {
        let mut rng = test_rng();
        let p = random_poly(9);
        let z = Fr::rand(&mut rng);
        let q = divide_by_linear(&p, z);
        let x = Fr::rand(&mut rng);
        assert_eq!(q.evaluate(&x) * (x - z) + p.evaluate(&z), p.evaluate(&x));
    }

    #[test]
    fn vanishing_division_reconstructs() {
        let mut rng = test_rng();
        let domain = Radix2EvaluationDomain::<Fr>::new(8).unwrap();
        let p = random_poly(21);
        let (q, r) = divide_by_vanishing(&p, &domain);
        assert!(r.coeffs.len() <= 8);
        let x = Fr::rand(&mut rng);
        let zh = domain.evaluate_vanishing_polynomial(x);
        assert_eq!(q.evaluate(&x) * zh + r.evaluate(&x), p.evaluate(&x));
    }

    #[test]
    fn interpolation_hits_domain_points() {
        let domain = Radix2EvaluationDomain::<Fr>::new(4).unwrap();
        let evals: Vec<Fr> = (1..=4u64).map(Fr::from).collect();
        let p = interpolate(&evals, &domain);
        for (i, e) in evals.iter().enumerate() {
            assert_eq!(p.evaluate(&domain.element(i)), *e);
        }
    }

    #[test]
    fn vanishing_multiple_keeps_domain_values() {
        let mut rng = test_rng();
        let domain = Radix2EvaluationDomain::<Fr>::new(4).unwrap();
        let p = random_poly(3);
        let blinded = add_vanishing_multiple(&p, &[Fr::rand(&mut rng), Fr::rand(&mut rng)], &domain);
        assert_eq!(blinded.degree(), 5);
        for i in 0..4 {
            let w = domain.element(i);
            assert_eq!(blinded.evaluate(&w), p.evaluate(&w));
        }
    }

    #[test]
    fn shifted_argument() {
        let mut rng = test_rng();
        let p = random_poly(5);
        let s = Fr::rand(&mut rng);
        let x = Fr::rand(&mut rng);
        assert_eq!(shift_argument(&p, s).evaluate(&x), p.evaluate(&(s * x)));
    }
}
