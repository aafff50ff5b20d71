//! Artifact serializer
//!
//! `vKey.bin` and `proof.bin` share one binary envelope:
//!
//! ```text
//! "NZKP" | version u8 | kind u8 | backend u8 | curve u8 | payload_len u64 LE | payload
//! ```
//!
//! The payload is the arkworks compressed canonical encoding, so equal
//! objects always encode to equal bytes. Decoding checks every header
//! field, the exact length and point validity.
//!
//! `pis.json` is a JSON array of canonical decimal strings in
//! public-variable order.

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Compress, Validate};
use serde::Serialize;
use sha3::{Digest, Keccak256};
use std::fs;
use std::path::Path;

use crate::errors::{PipelineError, Result};
use crate::field::{curve_name, PipelineCurve};
use crate::traits::{backend_name, ProofSystem};
use crate::witness::PublicWitness;

pub const MAGIC: &[u8; 4] = b"NZKP";
pub const FORMAT_VERSION: u8 = 1;
pub const HEADER_LEN: usize = 16;

pub const VK_FILE: &str = "vKey.bin";
pub const PROOF_FILE: &str = "proof.bin";
pub const PUBLIC_INPUTS_FILE: &str = "pis.json";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    VerifyingKey = 1,
    Proof = 2,
}

impl ArtifactKind {
    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(ArtifactKind::VerifyingKey),
            2 => Some(ArtifactKind::Proof),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub kind: ArtifactKind,
    pub backend: u8,
    pub curve: u8,
    pub payload_len: u64,
}

impl Header {
    /// Parse and validate the envelope header; the payload must have
    /// exactly the declared length
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(PipelineError::Serialization(format!(
                "artifact of {} bytes is shorter than its header",
                bytes.len()
            )));
        }
        if &bytes[..4] != MAGIC {
            return Err(PipelineError::Serialization("bad artifact magic".into()));
        }
        if bytes[4] != FORMAT_VERSION {
            return Err(PipelineError::Serialization(format!(
                "unsupported artifact version {}",
                bytes[4]
            )));
        }
        let kind = ArtifactKind::from_tag(bytes[5]).ok_or_else(|| {
            PipelineError::Serialization(format!("unknown artifact kind {}", bytes[5]))
        })?;
        let backend = bytes[6];
        if backend_name(backend).is_none() {
            return Err(PipelineError::Serialization(format!("unknown backend tag {}", backend)));
        }
        let curve = bytes[7];
        if curve_name(curve).is_none() {
            return Err(PipelineError::Serialization(format!("unknown curve tag {}", curve)));
        }
        let mut len = [0u8; 8];
        len.copy_from_slice(&bytes[8..HEADER_LEN]);
        let payload_len = u64::from_le_bytes(len);
        if payload_len != (bytes.len() - HEADER_LEN) as u64 {
            return Err(PipelineError::Serialization(format!(
                "payload is {} bytes, header declares {}",
                bytes.len() - HEADER_LEN,
                payload_len
            )));
        }
        Ok(Header {
            kind,
            backend,
            curve,
            payload_len,
        })
    }
}

pub fn encode<T: CanonicalSerialize>(kind: ArtifactKind, backend: u8, curve: u8, value: &T) -> Result<Vec<u8>> {
    let payload_len = value.serialized_size(Compress::Yes);
    let mut out = Vec::with_capacity(HEADER_LEN + payload_len);
    out.extend_from_slice(MAGIC);
    out.push(FORMAT_VERSION);
    out.push(kind as u8);
    out.push(backend);
    out.push(curve);
    out.extend_from_slice(&(payload_len as u64).to_le_bytes());
    value.serialize_compressed(&mut out)?;
    Ok(out)
}

pub fn decode<T: CanonicalDeserialize>(bytes: &[u8], kind: ArtifactKind, backend: u8, curve: u8) -> Result<T> {
    let header = Header::parse(bytes)?;
    if header.kind != kind || header.backend != backend || header.curve != curve {
        return Err(PipelineError::Serialization(format!(
            "expected {:?} for {}/{}, found {:?} for {}/{}",
            kind,
            backend_name(backend).unwrap_or("?"),
            curve_name(curve).unwrap_or("?"),
            header.kind,
            backend_name(header.backend).unwrap_or("?"),
            curve_name(header.curve).unwrap_or("?"),
        )));
    }
    let mut payload = &bytes[HEADER_LEN..];
    let value = T::deserialize_with_mode(&mut payload, Compress::Yes, Validate::Yes)?;
    if !payload.is_empty() {
        return Err(PipelineError::Serialization(format!(
            "{} trailing bytes after payload",
            payload.len()
        )));
    }
    Ok(value)
}

pub fn encode_verifying_key<E: PipelineCurve, S: ProofSystem<E>>(vk: &S::VerifyingKey) -> Result<Vec<u8>> {
    encode(ArtifactKind::VerifyingKey, S::BACKEND_ID, E::CURVE_ID, vk)
}

pub fn decode_verifying_key<E: PipelineCurve, S: ProofSystem<E>>(bytes: &[u8]) -> Result<S::VerifyingKey> {
    decode(bytes, ArtifactKind::VerifyingKey, S::BACKEND_ID, E::CURVE_ID)
}

pub fn encode_proof<E: PipelineCurve, S: ProofSystem<E>>(proof: &S::Proof) -> Result<Vec<u8>> {
    encode(ArtifactKind::Proof, S::BACKEND_ID, E::CURVE_ID, proof)
}

pub fn decode_proof<E: PipelineCurve, S: ProofSystem<E>>(bytes: &[u8]) -> Result<S::Proof> {
    decode(bytes, ArtifactKind::Proof, S::BACKEND_ID, E::CURVE_ID)
}

/// JSON array of decimal strings with one-space indentation
pub fn encode_public_inputs(values: &[String]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    values.serialize(&mut serializer)?;
    Ok(out)
}

pub fn decode_public_inputs(bytes: &[u8]) -> Result<Vec<String>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Hex Keccak-256 of an encoded verifying key
pub fn vk_digest(vk_bytes: &[u8]) -> String {
    hex::encode(Keccak256::digest(vk_bytes))
}

/// The three persisted files of one proving run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactBundle {
    pub vk_bytes: Vec<u8>,
    pub proof_bytes: Vec<u8>,
    pub public_inputs: Vec<String>,
}

impl ArtifactBundle {
    pub fn new<E: PipelineCurve, S: ProofSystem<E>>(
        vk: &S::VerifyingKey,
        proof: &S::Proof,
        public: &PublicWitness<E::ScalarField>,
    ) -> Result<Self> {
        Ok(Self {
            vk_bytes: encode_verifying_key::<E, S>(vk)?,
            proof_bytes: encode_proof::<E, S>(proof)?,
            public_inputs: public.to_decimal_strings(),
        })
    }

    /// Header of the verifying key file; tells a reader which backend and
    /// curve to decode with
    pub fn header(&self) -> Result<Header> {
        Header::parse(&self.vk_bytes)
    }

    pub fn vk_digest(&self) -> String {
        vk_digest(&self.vk_bytes)
    }

    pub fn decode<E: PipelineCurve, S: ProofSystem<E>>(
        &self,
    ) -> Result<(S::VerifyingKey, S::Proof, PublicWitness<E::ScalarField>)> {
        Ok((
            decode_verifying_key::<E, S>(&self.vk_bytes)?,
            decode_proof::<E, S>(&self.proof_bytes)?,
            PublicWitness::from_decimal_strings(&self.public_inputs)?,
        ))
    }

    #[tracing::instrument(skip_all, name = "artifacts::write", fields(dir = %dir.display()))]
    pub fn write_to_dir(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir)?;
        fs::write(dir.join(VK_FILE), &self.vk_bytes)?;
        fs::write(dir.join(PROOF_FILE), &self.proof_bytes)?;
        fs::write(dir.join(PUBLIC_INPUTS_FILE), encode_public_inputs(&self.public_inputs)?)?;
        tracing::info!(
            vk_bytes = self.vk_bytes.len(),
            proof_bytes = self.proof_bytes.len(),
            vk_digest = %self.vk_digest(),
            "artifacts written"
        );
        Ok(())
    }

    #[tracing::instrument(skip_all, name = "artifacts::read", fields(dir = %dir.display()))]
    pub fn read_from_dir(dir: &Path) -> Result<Self> {
        let vk_bytes = fs::read(dir.join(VK_FILE))?;
        let proof_bytes = fs::read(dir.join(PROOF_FILE))?;
        let public_inputs = decode_public_inputs(&fs::read(dir.join(PUBLIC_INPUTS_FILE))?)?;
        Ok(Self {
            vk_bytes,
            proof_bytes,
            public_inputs,
        })
    }
}
