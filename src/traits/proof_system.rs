//! Proof system trait abstraction
//!
//! A backend owns four stages over a shared circuit definition:
//! compile to its constraint format, derive keys, prove from a full
//! witness and verify from the public witness.
//!
//! ```ignore
//! use nizk_pipeline::traits::{Groth16, Plonk, ProofSystem};
//!
//! let cs = Groth16::<Bn254>::compile(&definition)?;
//! let cs = Plonk::<Bls12_381>::compile(&definition)?;
//! ```

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::rand::RngCore;
use core::fmt::Debug;
use core::marker::PhantomData;

use crate::circuit::CircuitDefinition;
use crate::errors::Result;
use crate::field::PipelineCurve;
use crate::r1cs::R1CSInstance;
use crate::srs::Srs;
use crate::gates::GateSystem;
use crate::witness::{PublicWitness, Witness};
use crate::{gates, groth16, plonk, r1cs};

pub const GROTH16_ID: u8 = 1;
pub const PLONK_ID: u8 = 2;

/// Core trait for a proving backend over the pairing `E`
pub trait ProofSystem<E: PipelineCurve>: Clone + Send + Sync + Debug {
    /// Backend tag written into artifact headers
    const BACKEND_ID: u8;
    const NAME: &'static str;

    type ConstraintSystem: Clone + Send + Sync + Debug;
    type ProvingKey: Clone + Send + Sync + Debug;
    type VerifyingKey: Clone
        + Send
        + Sync
        + Debug
        + PartialEq
        + CanonicalSerialize
        + CanonicalDeserialize;
    type Proof: Clone + Send + Sync + Debug + PartialEq + CanonicalSerialize + CanonicalDeserialize;

    fn compile(definition: &CircuitDefinition<E::ScalarField>) -> Result<Self::ConstraintSystem>;

    /// `(max_degree, domain_size)` of the SRS the backend's setup needs,
    /// or `None` when setup is circuit-specific
    fn srs_size(cs: &Self::ConstraintSystem) -> Option<(usize, usize)>;

    /// Derive the key pair
    ///
    /// # Arguments
    /// - `cs`: compiled constraint system
    /// - `srs`: universal parameters, required exactly when `srs_size` is `Some`
    /// - `rng`: randomness for any secret the setup samples
    fn setup<R: RngCore>(
        cs: &Self::ConstraintSystem,
        srs: Option<&Srs<E>>,
        rng: &mut R,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey)>;

    fn prove<R: RngCore>(
        pk: &Self::ProvingKey,
        witness: &Witness<E::ScalarField>,
        rng: &mut R,
    ) -> Result<Self::Proof>;

    /// `Ok(false)` rejects a well-formed proof; `Err` reports malformed input
    fn verify(
        vk: &Self::VerifyingKey,
        public: &PublicWitness<E::ScalarField>,
        proof: &Self::Proof,
    ) -> Result<bool>;
}

/// Quadratic-constraint backend
#[derive(Clone, Copy, Debug, Default)]
pub struct Groth16<E>(PhantomData<E>);

/// Gate-based backend
#[derive(Clone, Copy, Debug, Default)]
pub struct Plonk<E>(PhantomData<E>);

impl<E: PipelineCurve> ProofSystem<E> for Groth16<E> {
    const BACKEND_ID: u8 = GROTH16_ID;
    const NAME: &'static str = "groth16";

    type ConstraintSystem = R1CSInstance<E::ScalarField>;
    type ProvingKey = groth16::ProvingKey<E>;
    type VerifyingKey = groth16::VerifyingKey<E>;
    type Proof = groth16::Proof<E>;

    fn compile(definition: &CircuitDefinition<E::ScalarField>) -> Result<Self::ConstraintSystem> {
        r1cs::compile(definition)
    }

    fn srs_size(_cs: &Self::ConstraintSystem) -> Option<(usize, usize)> {
        None
    }

    fn setup<R: RngCore>(
        cs: &Self::ConstraintSystem,
        _srs: Option<&Srs<E>>,
        rng: &mut R,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey)> {
        groth16::setup(cs, rng)
    }

    fn prove<R: RngCore>(
        pk: &Self::ProvingKey,
        witness: &Witness<E::ScalarField>,
        rng: &mut R,
    ) -> Result<Self::Proof> {
        groth16::prove(pk, witness, rng)
    }

    fn verify(
        vk: &Self::VerifyingKey,
        public: &PublicWitness<E::ScalarField>,
        proof: &Self::Proof,
    ) -> Result<bool> {
        groth16::verify(vk, public, proof)
    }
}

impl<E: PipelineCurve> ProofSystem<E> for Plonk<E> {
    const BACKEND_ID: u8 = PLONK_ID;
    const NAME: &'static str = "plonk";

    type ConstraintSystem = GateSystem<E::ScalarField>;
    type ProvingKey = plonk::ProvingKey<E>;
    type VerifyingKey = plonk::VerifyingKey<E>;
    type Proof = plonk::Proof<E>;

    fn compile(definition: &CircuitDefinition<E::ScalarField>) -> Result<Self::ConstraintSystem> {
        gates::compile(definition)
    }

    fn srs_size(cs: &Self::ConstraintSystem) -> Option<(usize, usize)> {
        Some((plonk::required_degree(cs.domain_size), cs.domain_size))
    }

    fn setup<R: RngCore>(
        cs: &Self::ConstraintSystem,
        srs: Option<&Srs<E>>,
        rng: &mut R,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey)> {
        plonk::setup(cs, srs, rng)
    }

    fn prove<R: RngCore>(
        pk: &Self::ProvingKey,
        witness: &Witness<E::ScalarField>,
        rng: &mut R,
    ) -> Result<Self::Proof> {
        plonk::prove(pk, witness, rng)
    }

    fn verify(
        vk: &Self::VerifyingKey,
        public: &PublicWitness<E::ScalarField>,
        proof: &Self::Proof,
    ) -> Result<bool> {
        plonk::verify(vk, public, proof)
    }
}

/// Name of a backend tag, if known
pub fn backend_name(id: u8) -> Option<&'static str> {
    match id {
        GROTH16_ID => Some("groth16"),
        PLONK_ID => Some("plonk"),
        _ => None,
    }
}
