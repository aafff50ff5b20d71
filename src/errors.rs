//! Error types for the proof pipeline
//!
//! One variant per pipeline stage. Verification rejection is not an error:
//! verifiers return `Ok(false)` for a well-formed but invalid proof.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("circuit compilation failed: {0}")]
    Compilation(String),

    #[error("SRS generation failed: {0}")]
    SrsGeneration(String),

    #[error("setup failed: {0}")]
    Setup(String),

    #[error("witness generation failed: {0}")]
    Witness(String),

    #[error("proving failed: {0}")]
    Proving(String),

    #[error("malformed verification input: {0}")]
    VerificationInput(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl PipelineError {
    /// Name of the stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Compilation(_) => "compile",
            PipelineError::SrsGeneration(_) => "srs",
            PipelineError::Setup(_) => "setup",
            PipelineError::Witness(_) => "witness",
            PipelineError::Proving(_) => "prove",
            PipelineError::VerificationInput(_) => "verify",
            PipelineError::Serialization(_) => "serialize",
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Serialization(format!("storage I/O: {}", err))
    }
}

impl From<ark_serialize::SerializationError> for PipelineError {
    fn from(err: ark_serialize::SerializationError) -> Self {
        PipelineError::Serialization(format!("{}", err))
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(format!("public inputs JSON: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
