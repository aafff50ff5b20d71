//! # nizk-pipeline: circuit → keys → proof → verified artifacts
//!
//! One circuit definition, two proving backends:
//!
//! - Groth16 over an R1CS/QAP reduction, with a per-circuit trusted setup
//! - PLONK over a wide-gate table, with KZG commitments against a
//!   universal SRS
//!
//! ## Structure
//!
//! - `field`: curve tags and canonical decimal encoding of scalars
//! - `circuit`: circuit builder, definitions and the cubic reference circuit
//! - `witness`: witness generation and the public projection
//! - `r1cs`: quadratic constraint system
//! - `gates`: gate table and copy-constraint permutation
//! - `srs`: structured reference strings and their providers
//! - `groth16`, `plonk`: setup, prover and verifier per backend
//! - `traits`: the `ProofSystem` abstraction both backends implement
//! - `artifacts`: `vKey.bin` / `proof.bin` / `pis.json`
//! - `pipeline`: the sequential stage driver
//! - `config`: run configuration
//!
//! ## Architecture
//!
//! The pipeline is generic over the backend:
//! ```ignore
//! let run = pipeline::run::<Bn254, Groth16<Bn254>, _, _, _>(&circuit, &inputs, &UnsafeSrsProvider, &mut rng)?;
//! let run = pipeline::run::<Bn254, Plonk<Bn254>, _, _, _>(&circuit, &inputs, &UnsafeSrsProvider, &mut rng)?;
//! ```

pub mod artifacts;
pub mod circuit;
pub mod config;
pub mod field;
pub mod gates;
pub mod groth16;
pub mod pipeline;
pub mod plonk;
pub mod r1cs;
pub mod srs;
pub mod traits;
pub mod witness;

pub mod errors;
pub mod utils;

// Re-exports
pub use errors::{PipelineError, Result};
pub use traits::{Groth16, Plonk, ProofSystem};

/// Groth16 over BN254, the default CLI configuration
pub type Groth16Bn254 = Groth16<field::Bn254>;
pub type Groth16Bls12_381 = Groth16<field::Bls12_381>;
pub type PlonkBn254 = Plonk<field::Bn254>;
pub type PlonkBls12_381 = Plonk<field::Bls12_381>;
