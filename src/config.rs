//! Run configuration
//!
//! Plain data shared by the library driver and the `nizk` binary. A run
//! can also be described by a JSON file whose fields all are optional;
//! command-line flags take precedence over it.

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{PipelineError, Result};
use crate::field::{Bls12_381, Bn254, PipelineCurve};
use crate::traits::proof_system::{GROTH16_ID, PLONK_ID};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Groth16,
    Plonk,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Groth16 => "groth16",
            Backend::Plonk => "plonk",
        }
    }

    /// Artifact header tag
    pub fn id(&self) -> u8 {
        match self {
            Backend::Groth16 => GROTH16_ID,
            Backend::Plonk => PLONK_ID,
        }
    }

    /// `circuits/<backend>/circuit_data`
    pub fn default_output_dir(&self) -> PathBuf {
        PathBuf::from("circuits").join(self.name()).join("circuit_data")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum Curve {
    #[default]
    #[value(name = "bn254")]
    #[serde(rename = "bn254")]
    Bn254,
    #[value(name = "bls12-381")]
    #[serde(rename = "bls12-381")]
    Bls12_381,
}

impl Curve {
    pub fn id(&self) -> u8 {
        match self {
            Curve::Bn254 => Bn254::CURVE_ID,
            Curve::Bls12_381 => Bls12_381::CURVE_ID,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipelineConfig {
    pub backend: Backend,
    pub curve: Curve,
    /// Private input of the cubic circuit; `y` is derived from it
    pub x: u64,
    pub output_dir: PathBuf,
    /// Fixed seed for reproducible runs; entropy otherwise
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(Backend::default(), Curve::default())
    }
}

impl PipelineConfig {
    pub fn new(backend: Backend, curve: Curve) -> Self {
        Self {
            backend,
            curve,
            x: 3,
            output_dir: backend.default_output_dir(),
            seed: None,
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Partial run description, from a config file or from CLI flags
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub backend: Option<Backend>,
    pub curve: Option<Curve>,
    pub x: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl ConfigOverrides {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| PipelineError::Serialization(format!("config {}: {}", path.display(), e)))
    }

    /// Fields set here win; the rest come from `base`
    pub fn or(self, base: ConfigOverrides) -> ConfigOverrides {
        ConfigOverrides {
            backend: self.backend.or(base.backend),
            curve: self.curve.or(base.curve),
            x: self.x.or(base.x),
            output_dir: self.output_dir.or(base.output_dir),
            seed: self.seed.or(base.seed),
        }
    }

    /// Fill unset fields with defaults. The output directory follows the
    /// resolved backend.
    pub fn resolve(self) -> PipelineConfig {
        let mut config = PipelineConfig::new(self.backend.unwrap_or_default(), self.curve.unwrap_or_default());
        if let Some(x) = self.x {
            config.x = x;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = dir;
        }
        config.seed = self.seed;
        config
    }
}
