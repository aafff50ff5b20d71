//! Blake2b Fiat–Shamir transcript
//!
//! Messages are absorbed as `label || len_le || bytes`. A challenge hashes
//! the running state with its label, reduces the 64-byte digest modulo
//! the field order, then feeds the digest back into the state.

use ark_ec::pairing::Pairing;
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::CanonicalSerialize;
use blake2::Blake2b512;
use digest::{Digest, Output};

use super::VerifyingKey;
use crate::errors::Result;

const PROTOCOL_LABEL: &[u8] = b"nizk-pipeline/plonk/v1";

#[derive(Clone)]
pub struct Transcript {
    hasher: Blake2b512,
}

impl Transcript {
    pub fn new(domain_label: &[u8]) -> Self {
        let mut hasher = Blake2b512::default();
        hasher.update(domain_label);
        Self { hasher }
    }

    pub fn append_bytes(&mut self, label: &[u8], bytes: &[u8]) {
        self.hasher.update(label);
        self.hasher.update((bytes.len() as u64).to_le_bytes());
        self.hasher.update(bytes);
    }

    pub fn append_scalar<F: PrimeField>(&mut self, label: &[u8], x: &F) {
        self.append_bytes(label, &x.into_bigint().to_bytes_le());
    }

    pub fn append_serializable<S: CanonicalSerialize>(&mut self, label: &[u8], s: &S) -> Result<()> {
        let mut bytes = Vec::new();
        s.serialize_compressed(&mut bytes)?;
        self.append_bytes(label, &bytes);
        Ok(())
    }

    pub fn challenge_scalar<F: PrimeField>(&mut self, label: &[u8]) -> F {
        self.hasher.update(label);
        loop {
            let digest: Output<Blake2b512> = self.hasher.clone().finalize();
            self.hasher.update(&digest);
            let challenge = F::from_le_bytes_mod_order(&digest);
            if !challenge.is_zero() {
                return challenge;
            }
        }
    }
}

/// Transcript bound to the verifying key and the public inputs
pub(crate) fn start<E: Pairing>(
    vk: &VerifyingKey<E>,
    public: &[E::ScalarField],
) -> Result<Transcript> {
    let mut transcript = Transcript::new(PROTOCOL_LABEL);
    transcript.append_serializable(b"vk", vk)?;
    for x in public {
        transcript.append_scalar(b"pi", x);
    }
    Ok(transcript)
}
