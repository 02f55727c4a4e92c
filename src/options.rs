//! Resolver options
//!
//! Layered with figment: built-in defaults, then an optional YAML options file,
//! then `PANDA_CONFIG_*` environment variables.

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Recursion limit applied to override chains and to tree/call nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Prefix for environment variables that tune resolution.
pub const ENV_PREFIX: &str = "PANDA_CONFIG_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Maximum override chain length and maximum evaluation nesting.
    pub max_depth: usize,
    /// Evaluate function-call expressions after merging.
    pub evaluate: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, evaluate: true }
    }
}

impl ResolveOptions {
    /// Build the figment for these options without extracting it.
    pub fn figment(options_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(ResolveOptions::default()));
        if let Some(file) = options_file {
            figment = figment.merge(Yaml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load options from defaults, an optional YAML file, and the environment.
    pub fn load(options_file: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(options_file).extract()
    }
}
