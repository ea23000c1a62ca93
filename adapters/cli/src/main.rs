#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Terminal adapter that runs the Scavenger dungeon crawl.

mod session;

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use scavenger_core::GenerationConfig;
use scavenger_world::World;

use crate::session::Session;

/// Command-line arguments accepted by the Scavenger binary.
#[derive(Debug, Parser)]
#[command(name = "scavenger", about = "Turn-based dungeon crawl in the terminal")]
struct Args {
    /// Seed driving board generation and enemy behaviour. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a TOML file overriding the board generation tuning.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Key sequence to play non-interactively instead of reading stdin.
    #[arg(long, value_name = "KEYS")]
    script: Option<String>,
}

/// Entry point for the Scavenger command-line interface.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str::<GenerationConfig>(&contents)
                .context("failed to parse generation config toml contents")?
        }
        None => GenerationConfig::default(),
    };

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut session = Session::new(World::with_config(config), seed);
    session.run(args.script.as_deref())
}
