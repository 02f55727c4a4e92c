//! Resolve command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use super::utils::{render, OutputFormat};
use panda_config::{ConfigAgent, FunctionRegistry, ResolveOptions};

#[derive(Args)]
pub struct ResolveArgs {
    /// Entry-point configuration file
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,

    /// Recursion limit for override chains and expression nesting
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// YAML file with resolver options
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Merge overrides only; leave expressions unevaluated
    #[arg(long)]
    pub no_eval: bool,
}

pub fn run(args: ResolveArgs) -> Result<()> {
    let mut options = ResolveOptions::load(args.options.as_deref()).context("Invalid resolver options")?;
    if let Some(max_depth) = args.max_depth {
        options.max_depth = max_depth;
    }
    if args.no_eval {
        options.evaluate = false;
    }
    tracing::debug!(?options, "Resolver options");

    let agent = ConfigAgent::new(&args.path, FunctionRegistry::builtins()).with_options(options);
    let tree = agent
        .config()
        .with_context(|| format!("Failed to resolve {}", agent.path().display()))?;

    print!("{}", render(tree, args.format)?);
    Ok(())
}
