//! Chain command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use panda_config::{Loader, ResolveOptions};

#[derive(Args)]
pub struct ChainArgs {
    /// Entry-point configuration file
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Maximum override chain length
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,
}

pub fn run(args: ChainArgs) -> Result<()> {
    let max_depth = match args.max_depth {
        Some(n) => n,
        None => ResolveOptions::load(None).context("Invalid resolver options")?.max_depth,
    };

    let (_, chain) = Loader::new()
        .max_depth(max_depth)
        .load_with_chain(&args.path)
        .with_context(|| format!("Failed to load {}", args.path.display()))?;

    for (depth, path) in chain.ancestry().enumerate() {
        println!("{}{}", "  ".repeat(depth), path.display());
    }
    Ok(())
}
