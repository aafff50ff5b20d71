//! Structured reference strings for the KZG-based backend
//!
//! An SRS holds `[τ^i]₁` for `i ≤ max_degree` (monomial form, used for
//! blinded wire and quotient commitments), `[L_i(τ)]₁` over the circuit's
//! evaluation domain (Lagrange form, used for selector and permutation
//! commitments), and `[1]₂, [τ]₂` for the pairing check.
//!
//! Provenance is pluggable through [`SrsProvider`]: `UnsafeSrsProvider`
//! samples τ locally and forgets it, `FileSrsProvider` loads a ceremony
//! output.

use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, PrimeGroup};
use ark_ff::{One, UniformRand, Zero};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::errors::{self, PipelineError};
use crate::utils::msm::msm;

/// Largest monomial degree any provider will produce
pub const MAX_SRS_DEGREE: usize = 1 << 20;

#[derive(Clone, Debug, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Srs<E: Pairing> {
    pub powers_g1: Vec<E::G1Affine>,
    pub lagrange_g1: Vec<E::G1Affine>,
    pub g2: E::G2Affine,
    pub tau_g2: E::G2Affine,
}

impl<E: Pairing> Srs<E> {
    pub fn max_degree(&self) -> usize {
        self.powers_g1.len().saturating_sub(1)
    }

    pub fn lagrange_size(&self) -> usize {
        self.lagrange_g1.len()
    }

    /// Commit to coefficients in the monomial basis
    pub fn commit(&self, coeffs: &[E::ScalarField]) -> errors::Result<E::G1Affine> {
        if coeffs.len() > self.powers_g1.len() {
            return Err(PipelineError::Setup(format!(
                "polynomial of degree {} exceeds SRS degree {}",
                coeffs.len() - 1,
                self.max_degree()
            )));
        }
        Ok(msm::<E::G1>(&self.powers_g1[..coeffs.len()], coeffs).into_affine())
    }

    /// Commit to evaluations over the domain in the Lagrange basis
    pub fn commit_lagrange(&self, evals: &[E::ScalarField]) -> errors::Result<E::G1Affine> {
        if evals.len() != self.lagrange_g1.len() {
            return Err(PipelineError::Setup(format!(
                "{} evaluations for a Lagrange basis of size {}",
                evals.len(),
                self.lagrange_g1.len()
            )));
        }
        Ok(msm::<E::G1>(&self.lagrange_g1, evals).into_affine())
    }

    /// Derive the Lagrange form over a domain of `domain_size` from the
    /// monomial powers.
    ///
    /// `[L_i(τ)]₁ = (1/n) Σ_j ω^{-ij} [τ^j]₁`, which is the inverse FFT of the
    /// first `n` powers taken in G1.
    pub fn with_lagrange_basis(mut self, domain_size: usize) -> errors::Result<Self> {
        let domain = Radix2EvaluationDomain::<E::ScalarField>::new(domain_size)
            .filter(|d| d.size() == domain_size)
            .ok_or_else(|| {
                PipelineError::SrsGeneration(format!("no radix-2 domain of size {}", domain_size))
            })?;
        if domain_size > self.powers_g1.len() {
            return Err(PipelineError::SrsGeneration(format!(
                "Lagrange basis of size {} needs {} monomial powers, SRS has {}",
                domain_size,
                domain_size,
                self.powers_g1.len()
            )));
        }
        let powers: Vec<E::G1> = self.powers_g1[..domain_size].iter().map(|p| p.into_group()).collect();
        let lagrange = domain.ifft(&powers);
        self.lagrange_g1 = E::G1::normalize_batch(&lagrange);
        Ok(self)
    }

    /// Probabilistic well-formedness check.
    ///
    /// Checks `e(Σ r_i P_{i+1}, [1]₂) = e(Σ r_i P_i, [τ]₂)` for random `r`,
    /// and that the Lagrange basis is the one the powers define.
    pub fn verify_structure<R: RngCore>(&self, rng: &mut R) -> bool {
        if self.powers_g1.is_empty() || self.powers_g1[0] != E::G1Affine::generator() {
            return false;
        }
        if self.g2 != E::G2Affine::generator() {
            return false;
        }
        if self.powers_g1.len() > 1 {
            let r: Vec<E::ScalarField> =
                (0..self.powers_g1.len() - 1).map(|_| E::ScalarField::rand(rng)).collect();
            let shifted = msm::<E::G1>(&self.powers_g1[1..], &r);
            let base = msm::<E::G1>(&self.powers_g1[..self.powers_g1.len() - 1], &r);
            if E::pairing(shifted, self.g2) != E::pairing(base, self.tau_g2) {
                return false;
            }
        }
        if !self.lagrange_g1.is_empty() && !self.lagrange_matches_powers(rng) {
            return false;
        }
        true
    }

    /// `Σ r_i [L_i(τ)]₁` must equal the monomial commitment to the
    /// polynomial interpolating `r` over the domain.
    fn lagrange_matches_powers<R: RngCore>(&self, rng: &mut R) -> bool {
        let n = self.lagrange_g1.len();
        let Some(domain) = Radix2EvaluationDomain::<E::ScalarField>::new(n).filter(|d| d.size() == n) else {
            return false;
        };
        if n > self.powers_g1.len() {
            return false;
        }
        let r: Vec<E::ScalarField> = (0..n).map(|_| E::ScalarField::rand(rng)).collect();
        let coeffs = domain.ifft(&r);
        msm::<E::G1>(&self.lagrange_g1, &r) == msm::<E::G1>(&self.powers_g1[..n], &coeffs)
    }
}

/// Source of SRS material sized for a circuit
pub trait SrsProvider<E: Pairing> {
    /// SRS with at least `max_degree + 1` monomial powers and a Lagrange
    /// basis over the domain of size `domain_size`
    fn provide<R: RngCore>(&self, max_degree: usize, domain_size: usize, rng: &mut R) -> errors::Result<Srs<E>>;
}

fn check_requested_size(max_degree: usize, domain_size: usize) -> errors::Result<()> {
    if max_degree > MAX_SRS_DEGREE {
        return Err(PipelineError::SrsGeneration(format!(
            "requested degree {} exceeds the supported maximum {}",
            max_degree, MAX_SRS_DEGREE
        )));
    }
    if domain_size == 0 || !domain_size.is_power_of_two() || domain_size > max_degree + 1 {
        return Err(PipelineError::SrsGeneration(format!(
            "invalid domain size {} for degree {}",
            domain_size, max_degree
        )));
    }
    Ok(())
}

/// Test-grade SRS from freshly sampled τ.
///
/// The output is well formed, but whoever ran the generation could have
/// kept τ. Production deployments substitute a ceremony SRS through
/// [`FileSrsProvider`].
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsafeSrsProvider;

impl<E: Pairing> SrsProvider<E> for UnsafeSrsProvider {
    #[tracing::instrument(skip_all, name = "UnsafeSrsProvider::provide")]
    fn provide<R: RngCore>(&self, max_degree: usize, domain_size: usize, rng: &mut R) -> errors::Result<Srs<E>> {
        check_requested_size(max_degree, domain_size)?;
        let domain = Radix2EvaluationDomain::<E::ScalarField>::new(domain_size)
            .filter(|d| d.size() == domain_size)
            .ok_or_else(|| {
                PipelineError::SrsGeneration(format!("no radix-2 domain of size {}", domain_size))
            })?;

        // τ lives only in this scope and is never logged or returned.
        let mut tau = E::ScalarField::rand(rng);
        while tau.is_zero() || domain.evaluate_vanishing_polynomial(tau).is_zero() {
            tau = E::ScalarField::rand(rng);
        }

        let mut scalars = Vec::with_capacity(max_degree + 1);
        let mut power = E::ScalarField::one();
        for _ in 0..=max_degree {
            scalars.push(power);
            power *= tau;
        }
        let lagrange_scalars = domain.evaluate_all_lagrange_coefficients(tau);

        let g1 = E::G1::generator();
        let g2 = E::G2::generator();
        let powers: Vec<E::G1> = scalars.par_iter().map(|s| g1 * *s).collect();
        let lagrange: Vec<E::G1> = lagrange_scalars.par_iter().map(|s| g1 * *s).collect();
        let tau_g2 = (g2 * tau).into_affine();

        tracing::info!(max_degree, domain_size, "generated unsafe SRS");
        Ok(Srs {
            powers_g1: E::G1::normalize_batch(&powers),
            lagrange_g1: E::G1::normalize_batch(&lagrange),
            g2: g2.into_affine(),
            tau_g2,
        })
    }
}

/// SRS loaded from a compressed canonical encoding on disk
#[derive(Clone, Debug)]
pub struct FileSrsProvider {
    pub path: PathBuf,
}

impl FileSrsProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl<E: Pairing> SrsProvider<E> for FileSrsProvider {
    #[tracing::instrument(skip_all, name = "FileSrsProvider::provide")]
    fn provide<R: RngCore>(&self, max_degree: usize, domain_size: usize, rng: &mut R) -> errors::Result<Srs<E>> {
        check_requested_size(max_degree, domain_size)?;
        let file = File::open(&self.path).map_err(|e| {
            PipelineError::SrsGeneration(format!("cannot open {}: {}", self.path.display(), e))
        })?;
        let mut srs = Srs::<E>::deserialize_compressed(BufReader::new(file))
            .map_err(|e| PipelineError::SrsGeneration(format!("corrupt SRS file: {}", e)))?;
        if srs.max_degree() < max_degree {
            return Err(PipelineError::SrsGeneration(format!(
                "SRS file supports degree {}, circuit needs {}",
                srs.max_degree(),
                max_degree
            )));
        }
        srs.powers_g1.truncate(max_degree + 1);
        // Any stored Lagrange basis is discarded and rebuilt from the powers.
        let srs = srs.with_lagrange_basis(domain_size)?;
        if !srs.verify_structure(rng) {
            return Err(PipelineError::SrsGeneration("SRS file failed the structure check".into()));
        }
        tracing::info!(path = %self.path.display(), max_degree, domain_size, "loaded SRS");
        Ok(srs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};
    use ark_poly::univariate::DensePolynomial;
    use ark_poly::DenseUVPolynomial;
    use ark_std::test_rng;

    fn srs(max_degree: usize, domain_size: usize) -> Srs<Bn254> {
        SrsProvider::<Bn254>::provide(&UnsafeSrsProvider, max_degree, domain_size, &mut test_rng())
            .unwrap()
    }

    #[test]
    fn sizes_match_request() {
        let s = srs(13, 8);
        assert_eq!(s.max_degree(), 13);
        assert_eq!(s.lagrange_size(), 8);
        assert!(s.verify_structure(&mut test_rng()));
    }

    #[test]
    fn lagrange_and_monomial_commitments_agree() {
        let mut rng = test_rng();
        let s = srs(9, 8);
        let evals: Vec<Fr> = (0..8).map(|_| Fr::rand(&mut rng)).collect();
        let domain = Radix2EvaluationDomain::<Fr>::new(8).unwrap();
        let coeffs = DensePolynomial::from_coefficients_vec(domain.ifft(&evals));
        assert_eq!(s.commit_lagrange(&evals).unwrap(), s.commit(&coeffs.coeffs).unwrap());
    }

    #[test]
    fn derived_lagrange_basis_matches_generated() {
        let s = srs(9, 8);
        let derived = s.clone().with_lagrange_basis(8).unwrap();
        assert_eq!(derived.lagrange_g1, s.lagrange_g1);
    }

    #[test]
    fn oversized_request_rejected() {
        let err = SrsProvider::<Bn254>::provide(&UnsafeSrsProvider, MAX_SRS_DEGREE + 1, 8, &mut test_rng())
            .unwrap_err();
        assert!(matches!(err, PipelineError::SrsGeneration(_)));
    }

    #[test]
    fn non_power_of_two_domain_rejected() {
        let err = SrsProvider::<Bn254>::provide(&UnsafeSrsProvider, 16, 6, &mut test_rng()).unwrap_err();
        assert!(matches!(err, PipelineError::SrsGeneration(_)));
    }

    #[test]
    fn commit_beyond_degree_rejected() {
        let s = srs(3, 4);
        assert!(s.commit(&[Fr::one(); 5]).is_err());
    }

    #[test]
    fn tampered_srs_fails_structure_check() {
        let mut s = srs(7, 4);
        s.powers_g1[3] = s.powers_g1[2];
        assert!(!s.verify_structure(&mut test_rng()));
    }

    #[test]
    fn file_provider_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("srs.bin");
        let s = srs(20, 16);
        let mut bytes = Vec::new();
        s.serialize_compressed(&mut bytes).unwrap();
        std::fs::write(&path, bytes).unwrap();

        let provider = FileSrsProvider::new(&path);
        let loaded: Srs<Bn254> = provider.provide(13, 8, &mut test_rng()).unwrap();
        assert_eq!(loaded.max_degree(), 13);
        assert_eq!(loaded.lagrange_size(), 8);
        assert_eq!(loaded.powers_g1[..], s.powers_g1[..14]);

        assert!(SrsProvider::<Bn254>::provide(&provider, 21, 8, &mut test_rng()).is_err());
    }

    #[test]
    fn canonical_encoding_round_trip() {
        let s = srs(9, 8);
        let mut bytes = Vec::new();
        s.serialize_compressed(&mut bytes).unwrap();
        assert_eq!(bytes.len(), s.compressed_size());
        assert_eq!(Srs::<Bn254>::deserialize_compressed(&bytes[..]).unwrap(), s);
    }

    #[test]
    fn permuted_lagrange_basis_fails_structure_check() {
        let mut s = srs(9, 4);
        s.lagrange_g1.swap(1, 2);
        assert!(!s.verify_structure(&mut test_rng()));
    }

    #[test]
    fn file_provider_rebuilds_stored_lagrange_basis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("srs.bin");
        let honest = srs(9, 4);
        let mut tampered = honest.clone();
        tampered.lagrange_g1.swap(1, 2);
        let mut bytes = Vec::new();
        tampered.serialize_compressed(&mut bytes).unwrap();
        std::fs::write(&path, bytes).unwrap();

        let loaded: Srs<Bn254> = FileSrsProvider::new(&path).provide(9, 4, &mut test_rng()).unwrap();
        assert_eq!(loaded.lagrange_g1, honest.lagrange_g1);
    }
}
