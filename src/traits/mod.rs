//! Trait abstractions over proving backends
//!
//! The pipeline is written once against [`ProofSystem`]; the quadratic
//! (Groth16) and gate-based (PLONK) backends plug in underneath it.

pub mod proof_system;

pub use proof_system::{backend_name, Groth16, Plonk, ProofSystem};
