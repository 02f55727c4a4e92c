//! panda-config: resolve hierarchical YAML configuration from the command line
//!
//! Follows `override` chains, deep-merges them, and evaluates function-call
//! expressions with the built-in function set.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
