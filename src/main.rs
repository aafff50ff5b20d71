use std::path::PathBuf;
use std::process::exit;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nizk_pipeline::config::{Backend, ConfigOverrides, Curve};
use nizk_pipeline::pipeline;

#[derive(Parser)]
#[command(version, about = "Prove and verify y = x^3 + x + 5 with Groth16 or PLONK", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: NizkCommand,
}

#[derive(Subcommand)]
enum NizkCommand {
    /// Compile, set up, prove, verify in-process and write vKey.bin, proof.bin and pis.json
    Prove {
        /// Proof system [default: groth16]
        #[arg(long, value_enum)]
        backend: Option<Backend>,
        /// Pairing curve [default: bn254]
        #[arg(long, value_enum)]
        curve: Option<Curve>,
        /// Private input; the public output y is computed from it [default: 3]
        #[arg(long)]
        x: Option<u64>,
        /// Output directory [default: circuits/<backend>/circuit_data]
        #[arg(long)]
        out: Option<PathBuf>,
        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// JSON run description; flags given on the command line override it
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Verify a previously written bundle
    Verify {
        /// Directory holding vKey.bin, proof.bin and pis.json
        #[arg(long)]
        dir: PathBuf,
        /// Expected backend; taken from the artifact headers when omitted
        #[arg(long, value_enum)]
        backend: Option<Backend>,
        /// Expected curve; taken from the artifact headers when omitted
        #[arg(long, value_enum)]
        curve: Option<Curve>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        NizkCommand::Prove {
            backend,
            curve,
            x,
            out,
            seed,
            config,
        } => {
            let file = match config {
                Some(path) => ConfigOverrides::load(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => ConfigOverrides::default(),
            };
            let flags = ConfigOverrides {
                backend,
                curve,
                x,
                output_dir: out,
                seed,
            };
            let config = flags.or(file).resolve();
            let bundle = pipeline::prove_to_dir(&config)
                .map_err(|e| anyhow::anyhow!("{} stage failed: {}", e.stage(), e))?;
            println!("wrote {}", config.output_dir.display());
            println!("public inputs: {:?}", bundle.public_inputs);
            println!("vk digest: 0x{}", bundle.vk_digest());
        }
        NizkCommand::Verify { dir, backend, curve } => {
            let accepted = pipeline::verify_dir_as(&dir, backend, curve)
                .with_context(|| format!("failed to verify bundle in {}", dir.display()))?;
            if accepted {
                println!("accepted");
            } else {
                println!("rejected");
                exit(1);
            }
        }
    }
    Ok(())
}
